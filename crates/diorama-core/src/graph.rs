//! The diagram graph model.
//!
//! A [`Graph`] is an ordered list of [`Node`]s and an ordered list of
//! directed [`Edge`]s. Order matters: every "first occurrence wins" rule in
//! the engine breaks ties by the position of an element in these lists.
//!
//! # Invariants
//!
//! - Node ids are unique within a graph.
//! - Every edge's `source` and `target` name a node of the same graph.
//!
//! Neither invariant is enforced on construction, since graphs arrive from
//! editors and external proposal payloads. Lookups by id are last-write-wins
//! when ids repeat, and edges whose endpoints are missing ("dangling") are
//! reported by [`Graph::dangling_edges`] and removed by
//! [`Graph::split_dangling`].
//!
//! # Wire form
//!
//! ```json
//! {
//!   "nodes": [{"id": "A", "kind": "process", "position": {"x": 0, "y": 0}}],
//!   "edges": [{"source": "A", "target": "B", "sourceAnchor": "bottom"}]
//! }
//! ```

use std::collections::HashSet;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::{
    geometry::{Bounds, Point, Size},
    identifier::Id,
    kind::{Anchor, KindSizes, NodeKind},
};

/// A positioned diagram element.
///
/// Nodes are value records: the `with_*` methods return modified copies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    id: Id,
    #[serde(default)]
    kind: NodeKind,
    #[serde(default)]
    position: Point,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    size: Option<Size>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    label: Option<String>,
}

impl Node {
    /// Creates a node without explicit size or label.
    pub fn new(id: impl Into<Id>, kind: NodeKind, position: Point) -> Self {
        Self {
            id: id.into(),
            kind,
            position,
            size: None,
            label: None,
        }
    }

    pub fn id(&self) -> &Id {
        &self.id
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    /// Returns the top-left corner of the node
    pub fn position(&self) -> Point {
        self.position
    }

    /// Returns the explicit size override, if any
    pub fn size(&self) -> Option<Size> {
        self.size
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Returns the explicit size, or the kind-keyed default from `sizes`.
    pub fn effective_size(&self, sizes: &KindSizes) -> Size {
        self.size.unwrap_or_else(|| sizes.size_for(self.kind))
    }

    /// Returns the box covered by the node.
    pub fn bounds(&self, sizes: &KindSizes) -> Bounds {
        Bounds::new_from_top_left(self.position, self.effective_size(sizes))
    }

    pub fn with_id(mut self, id: impl Into<Id>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_position(mut self, position: Point) -> Self {
        self.position = position;
        self
    }

    pub fn with_size(mut self, size: Size) -> Self {
        self.size = Some(size);
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

/// A directed connection between two nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<Id>,
    source: Id,
    target: Id,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    source_anchor: Option<Anchor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    target_anchor: Option<Anchor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    label: Option<String>,
}

impl Edge {
    /// Creates an edge without explicit id, anchors, or label.
    pub fn new(source: impl Into<Id>, target: impl Into<Id>) -> Self {
        Self {
            id: None,
            source: source.into(),
            target: target.into(),
            source_anchor: None,
            target_anchor: None,
            label: None,
        }
    }

    /// Returns the explicit id, if the edge was declared with one
    pub fn id(&self) -> Option<&Id> {
        self.id.as_ref()
    }

    /// Returns the explicit id, or the derived `e<source>-<target>` form.
    pub fn effective_id(&self) -> Id {
        self.id
            .clone()
            .unwrap_or_else(|| Id::for_edge(&self.source, &self.target))
    }

    pub fn source(&self) -> &Id {
        &self.source
    }

    pub fn target(&self) -> &Id {
        &self.target
    }

    pub fn source_anchor(&self) -> Option<Anchor> {
        self.source_anchor
    }

    pub fn target_anchor(&self) -> Option<Anchor> {
        self.target_anchor
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn with_id(mut self, id: impl Into<Id>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Returns a copy pointing at different endpoints, keeping everything else.
    pub fn with_endpoints(mut self, source: Id, target: Id) -> Self {
        self.source = source;
        self.target = target;
        self
    }

    pub fn with_source_anchor(mut self, anchor: Anchor) -> Self {
        self.source_anchor = Some(anchor);
        self
    }

    pub fn with_target_anchor(mut self, anchor: Anchor) -> Self {
        self.target_anchor = Some(anchor);
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

/// An ordered collection of nodes and directed edges.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Graph {
    #[serde(default)]
    nodes: Vec<Node>,
    #[serde(default)]
    edges: Vec<Edge>,
}

impl Graph {
    pub fn new(nodes: Vec<Node>, edges: Vec<Edge>) -> Self {
        Self { nodes, edges }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Consumes the graph, returning its node and edge lists.
    pub fn into_parts(self) -> (Vec<Node>, Vec<Edge>) {
        (self.nodes, self.edges)
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns the node with `id`. When ids repeat, the last one wins.
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().rev().find(|node| node.id == *id)
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.nodes.iter().any(|node| node.id == *id)
    }

    /// Returns the set of node ids present in the graph.
    pub fn node_ids(&self) -> HashSet<&Id> {
        self.nodes.iter().map(Node::id).collect()
    }

    /// Returns the edges leaving `id`, in input order.
    pub fn outgoing<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a Edge> + 'a {
        self.edges.iter().filter(move |edge| edge.source == *id)
    }

    /// Returns the edges entering `id`, in input order.
    pub fn incoming<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a Edge> + 'a {
        self.edges.iter().filter(move |edge| edge.target == *id)
    }

    /// Returns the edges whose source or target is not a node of this graph.
    pub fn dangling_edges(&self) -> Vec<&Edge> {
        let ids = self.node_ids();
        self.edges
            .iter()
            .filter(|edge| !ids.contains(&edge.source) || !ids.contains(&edge.target))
            .collect()
    }

    /// Separates dangling edges from the graph.
    ///
    /// Returns a graph holding every node and every edge whose endpoints both
    /// exist, plus the edges that were removed. Each removal is logged at
    /// `warn` level.
    pub fn split_dangling(self) -> (Graph, Vec<Edge>) {
        let ids: HashSet<Id> = self.nodes.iter().map(|node| node.id.clone()).collect();
        let (kept, dropped): (Vec<Edge>, Vec<Edge>) = self
            .edges
            .into_iter()
            .partition(|edge| ids.contains(&edge.source) && ids.contains(&edge.target));

        for edge in &dropped {
            let edge_id = edge.effective_id();
            let missing = if ids.contains(&edge.source) {
                &edge.target
            } else {
                &edge.source
            };
            warn!(
                edge_id = edge_id.as_str(),
                missing = missing.as_str();
                "Dropping edge with missing endpoint"
            );
        }

        (Graph::new(self.nodes, kept), dropped)
    }
}
