//! Bounding box computation over node sets.
//!
//! A node covers `[x, x + w] × [y, y + h]`, where `(w, h)` is its explicit
//! size or the default for its kind. The box of a node set is the union of
//! its members' boxes.

use diorama_core::{
    geometry::{Bounds, Point},
    graph::Node,
    kind::KindSizes,
};

use crate::config::DEFAULT_EMPTY_SIZE;

/// Returns the box reported for an empty node set.
pub fn empty_bounds() -> Bounds {
    Bounds::new_from_center(Point::default(), DEFAULT_EMPTY_SIZE)
}

/// Returns the union box of `nodes`, or `None` when there are none.
pub fn union_bounds<'a, I>(nodes: I, sizes: &KindSizes) -> Option<Bounds>
where
    I: IntoIterator<Item = &'a Node>,
{
    nodes
        .into_iter()
        .map(|node| node.bounds(sizes))
        .reduce(|acc, bounds| acc.merge(&bounds))
}

/// Computes the axis-aligned box enclosing every node.
///
/// An empty slice yields [`empty_bounds`], an 800×600 box centered at the
/// origin. Use [`union_bounds`] to tell the two cases apart.
///
/// # Examples
///
/// ```
/// # use diorama::bounds::compute_bounds;
/// # use diorama_core::{geometry::{Bounds, Point}, graph::Node, kind::{KindSizes, NodeKind}};
/// let nodes = [
///     Node::new("start", NodeKind::Process, Point::new(0.0, 0.0)),
///     Node::new("check", NodeKind::Decision, Point::new(30.0, 120.0)),
/// ];
///
/// let bounds = compute_bounds(&nodes, &KindSizes::default());
/// assert_eq!(bounds, Bounds::new(0.0, 0.0, 160.0, 220.0));
/// ```
pub fn compute_bounds(nodes: &[Node], sizes: &KindSizes) -> Bounds {
    union_bounds(nodes, sizes).unwrap_or_else(empty_bounds)
}

#[cfg(test)]
mod tests {
    use diorama_core::{geometry::Size, kind::NodeKind};

    use super::*;

    #[test]
    fn test_empty_nodes_use_fallback_box() {
        let bounds = compute_bounds(&[], &KindSizes::default());

        assert_eq!(bounds, Bounds::new(-400.0, -300.0, 400.0, 300.0));
        assert_eq!(bounds.center(), Point::default());
        assert!(union_bounds(&[], &KindSizes::default()).is_none());
    }

    #[test]
    fn test_single_node_with_explicit_size() {
        let node = Node::new("a", NodeKind::Decision, Point::new(-10.0, 5.0))
            .with_size(Size::new(40.0, 30.0));

        let bounds = compute_bounds(&[node], &KindSizes::default());
        assert_eq!(bounds, Bounds::new(-10.0, 5.0, 30.0, 35.0));
    }

    #[test]
    fn test_kind_defaults_differ() {
        let sizes = KindSizes::default();
        let decision = Node::new("d", NodeKind::Decision, Point::default());
        let process = Node::new("p", NodeKind::Process, Point::default());

        let decision_bounds = compute_bounds(std::slice::from_ref(&decision), &sizes);
        let process_bounds = compute_bounds(std::slice::from_ref(&process), &sizes);

        assert_eq!(decision_bounds.width(), decision_bounds.height());
        assert!(process_bounds.width() > process_bounds.height());
    }

    #[test]
    fn test_configured_sizes_are_used() {
        let sizes = KindSizes::default().with_size(NodeKind::Note, Size::new(10.0, 10.0));
        let node = Node::new("n", NodeKind::Note, Point::new(1.0, 1.0));

        assert_eq!(
            compute_bounds(&[node], &sizes),
            Bounds::new(1.0, 1.0, 11.0, 11.0)
        );
    }

    #[test]
    fn test_union_spans_negative_coordinates() {
        let sizes = KindSizes::default();
        let nodes = [
            Node::new("a", NodeKind::Process, Point::new(-200.0, -50.0))
                .with_size(Size::new(100.0, 50.0)),
            Node::new("b", NodeKind::Process, Point::new(300.0, 400.0))
                .with_size(Size::new(100.0, 50.0)),
        ];

        assert_eq!(
            compute_bounds(&nodes, &sizes),
            Bounds::new(-200.0, -50.0, 400.0, 450.0)
        );
    }
}
