//! Node categories, their default sizes, and edge anchor sides.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::geometry::Size;

/// The closed set of diagram element categories.
///
/// A node's kind decides its default size when the node carries no explicit
/// one. Serialized in lowercase (`"process"`, `"decision"`, ...).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    /// A wide rectangular process step.
    #[default]
    Process,
    /// A roughly square decision point.
    Decision,
    /// A start or end pill.
    Terminal,
    /// An input/output element.
    Data,
    /// A free-standing annotation.
    Note,
}

impl NodeKind {
    /// All kinds in declaration order.
    pub const ALL: [NodeKind; 5] = [
        NodeKind::Process,
        NodeKind::Decision,
        NodeKind::Terminal,
        NodeKind::Data,
        NodeKind::Note,
    ];

    /// Returns the built-in size used when neither the node nor the
    /// configuration provides one.
    pub fn default_size(self) -> Size {
        match self {
            NodeKind::Process => Size::new(160.0, 60.0),
            NodeKind::Decision => Size::new(100.0, 100.0),
            NodeKind::Terminal => Size::new(140.0, 50.0),
            NodeKind::Data => Size::new(160.0, 60.0),
            NodeKind::Note => Size::new(120.0, 80.0),
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NodeKind::Process => "process",
            NodeKind::Decision => "decision",
            NodeKind::Terminal => "terminal",
            NodeKind::Data => "data",
            NodeKind::Note => "note",
        };
        f.write_str(name)
    }
}

/// Kind-keyed default sizes.
///
/// Every field falls back to [`NodeKind::default_size`] when omitted, so a
/// configuration file only needs to list the kinds it overrides:
///
/// ```toml
/// [sizes]
/// decision = { width = 120.0, height = 120.0 }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KindSizes {
    process: Size,
    decision: Size,
    terminal: Size,
    data: Size,
    note: Size,
}

impl Default for KindSizes {
    fn default() -> Self {
        Self {
            process: NodeKind::Process.default_size(),
            decision: NodeKind::Decision.default_size(),
            terminal: NodeKind::Terminal.default_size(),
            data: NodeKind::Data.default_size(),
            note: NodeKind::Note.default_size(),
        }
    }
}

impl KindSizes {
    /// Returns the default size for `kind`.
    pub fn size_for(&self, kind: NodeKind) -> Size {
        match kind {
            NodeKind::Process => self.process,
            NodeKind::Decision => self.decision,
            NodeKind::Terminal => self.terminal,
            NodeKind::Data => self.data,
            NodeKind::Note => self.note,
        }
    }

    /// Returns a copy with the size for `kind` replaced.
    pub fn with_size(mut self, kind: NodeKind, size: Size) -> Self {
        let slot = match kind {
            NodeKind::Process => &mut self.process,
            NodeKind::Decision => &mut self.decision,
            NodeKind::Terminal => &mut self.terminal,
            NodeKind::Data => &mut self.data,
            NodeKind::Note => &mut self.note,
        };
        *slot = size;
        self
    }
}

/// The side of a node an edge attaches to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Anchor {
    Top,
    Right,
    Bottom,
    Left,
}

impl Anchor {
    /// Side used for an edge's source end when none is given (top-to-bottom flow).
    pub const DEFAULT_SOURCE: Anchor = Anchor::Bottom;

    /// Side used for an edge's target end when none is given.
    pub const DEFAULT_TARGET: Anchor = Anchor::Top;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decision_is_square_and_process_is_wide() {
        let decision = NodeKind::Decision.default_size();
        let process = NodeKind::Process.default_size();

        assert_eq!(decision.width(), decision.height());
        assert!(process.width() > process.height());
    }

    #[test]
    fn test_kind_sizes_default_matches_builtin() {
        let sizes = KindSizes::default();
        for kind in NodeKind::ALL {
            assert_eq!(sizes.size_for(kind), kind.default_size());
        }
    }

    #[test]
    fn test_kind_sizes_with_size() {
        let sizes = KindSizes::default().with_size(NodeKind::Note, Size::new(10.0, 20.0));
        assert_eq!(sizes.size_for(NodeKind::Note), Size::new(10.0, 20.0));
        assert_eq!(
            sizes.size_for(NodeKind::Process),
            NodeKind::Process.default_size()
        );
    }

    #[test]
    fn test_kind_sizes_partial_json() {
        let sizes: KindSizes =
            serde_json::from_str(r#"{"decision": {"width": 80.0, "height": 80.0}}"#).unwrap();
        assert_eq!(sizes.size_for(NodeKind::Decision), Size::new(80.0, 80.0));
        assert_eq!(
            sizes.size_for(NodeKind::Terminal),
            NodeKind::Terminal.default_size()
        );
    }

    #[test]
    fn test_kind_and_anchor_wire_names() {
        assert_eq!(
            serde_json::to_string(&NodeKind::Decision).unwrap(),
            "\"decision\""
        );
        assert_eq!(
            serde_json::from_str::<Anchor>("\"left\"").unwrap(),
            Anchor::Left
        );
        assert_eq!(NodeKind::Terminal.to_string(), "terminal");
    }
}
