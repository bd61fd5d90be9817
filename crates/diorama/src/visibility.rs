//! Step-to-visibility mapping for presentations.
//!
//! At step `k` the first `k + 1` nodes of the reveal [`Order`] are visible,
//! the `k`-th of them is active, and every edge whose endpoints are both
//! visible is drawn. An edge therefore appears the moment its later endpoint
//! is revealed.

use std::collections::HashSet;

use serde::Serialize;

use diorama_core::{
    geometry::{Bounds, Insets, Point},
    graph::{Edge, Graph},
    identifier::Id,
    kind::KindSizes,
};

use crate::{bounds::union_bounds, sequence::Order};

/// What is on screen at one reveal step.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Visibility {
    step: usize,
    visible_node_ids: Vec<Id>,
    visible_edges: Vec<Edge>,
    active_node_id: Option<Id>,
}

impl Visibility {
    /// Returns the clamped step this visibility was computed for
    pub fn step(&self) -> usize {
        self.step
    }

    pub fn visible_node_ids(&self) -> &[Id] {
        &self.visible_node_ids
    }

    pub fn visible_edges(&self) -> &[Edge] {
        &self.visible_edges
    }

    /// Returns the most recently revealed node
    pub fn active_node_id(&self) -> Option<&Id> {
        self.active_node_id.as_ref()
    }

    pub fn is_visible(&self, id: &str) -> bool {
        self.visible_node_ids.iter().any(|visible| visible == id)
    }

    /// Returns the center of the active node, the point a renderer centers on.
    pub fn focus(&self, graph: &Graph, sizes: &KindSizes) -> Option<Point> {
        let active = self.active_node_id.as_ref()?;
        graph
            .node(active.as_str())
            .map(|node| node.bounds(sizes).center())
    }

    /// Returns the box enclosing every visible node, grown by `padding`.
    pub fn visible_bounds(&self, graph: &Graph, sizes: &KindSizes, padding: Insets) -> Option<Bounds> {
        let visible: HashSet<&str> = self.visible_node_ids.iter().map(Id::as_str).collect();
        let nodes = graph
            .nodes()
            .iter()
            .filter(|node| visible.contains(node.id().as_str()));

        union_bounds(nodes, sizes).map(|bounds| bounds.add_padding(padding))
    }
}

/// Computes what is visible at `step` of `order`.
///
/// Steps past the end are clamped to the last step. An empty order yields an
/// empty visibility with no active node.
///
/// # Examples
///
/// ```
/// # use diorama::{sequence::compute_order, visibility::compute_visibility};
/// # use diorama_core::{geometry::Point, graph::{Edge, Graph, Node}, kind::NodeKind};
/// let node = |id: &str| Node::new(id, NodeKind::Process, Point::default());
/// let graph = Graph::new(
///     vec![node("A"), node("B"), node("C")],
///     vec![Edge::new("A", "B"), Edge::new("B", "C")],
/// );
/// let order = compute_order(&graph);
///
/// let visibility = compute_visibility(&graph, &order, 1);
/// assert_eq!(visibility.visible_node_ids(), ["A", "B"]);
/// assert_eq!(visibility.visible_edges(), [Edge::new("A", "B")]);
/// assert_eq!(visibility.active_node_id().unwrap(), "B");
/// ```
pub fn compute_visibility(graph: &Graph, order: &Order, step: usize) -> Visibility {
    let ordered = order.ordered_node_ids();
    if ordered.is_empty() {
        return Visibility::default();
    }

    let step = step.min(ordered.len() - 1);
    let visible_node_ids = ordered[..=step].to_vec();
    let visible: HashSet<&Id> = visible_node_ids.iter().collect();

    let visible_edges = graph
        .edges()
        .iter()
        .filter(|edge| visible.contains(edge.source()) && visible.contains(edge.target()))
        .cloned()
        .collect();

    Visibility {
        step,
        active_node_id: Some(ordered[step].clone()),
        visible_node_ids,
        visible_edges,
    }
}

/// A cursor over the reveal steps of one graph.
///
/// Owns the graph and its order so a presentation UI can move forward and
/// backward without recomputing the traversal. All moves are clamped.
#[derive(Debug, Clone)]
pub struct Presentation {
    graph: Graph,
    order: Order,
    step: usize,
}

impl Presentation {
    /// Creates a presentation positioned at the first step.
    pub fn new(graph: Graph) -> Self {
        let order = crate::sequence::compute_order(&graph);
        Self {
            graph,
            order,
            step: 0,
        }
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn order(&self) -> &Order {
        &self.order
    }

    /// Returns the number of steps.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Returns the current step index.
    pub fn step(&self) -> usize {
        self.step
    }

    /// Returns what is visible at the current step.
    pub fn current(&self) -> Visibility {
        compute_visibility(&self.graph, &self.order, self.step)
    }

    /// Moves to the next step. Returns false if already at the last one.
    pub fn advance(&mut self) -> bool {
        if self.step + 1 < self.len() {
            self.step += 1;
            true
        } else {
            false
        }
    }

    /// Moves to the previous step. Returns false if already at the first one.
    pub fn retreat(&mut self) -> bool {
        if self.step > 0 {
            self.step -= 1;
            true
        } else {
            false
        }
    }

    /// Jumps to `step`, clamped to the last step.
    pub fn seek(&mut self, step: usize) {
        self.step = step.min(self.len().saturating_sub(1));
    }
}


#[cfg(test)]
mod proptest_tests {
    use std::collections::HashSet;

    use proptest::prelude::*;

    use diorama_core::{geometry::Point, graph::Node, kind::NodeKind};

    use super::*;
    use crate::sequence::compute_order;

    // ===================
    // Strategies
    // ===================

    fn graph_strategy() -> impl Strategy<Value = Graph> {
        (1usize..10).prop_flat_map(|node_count| {
            prop::collection::vec((0..node_count, 0..node_count), 0..20).prop_map(move |pairs| {
                let nodes = (0..node_count)
                    .map(|idx| Node::new(format!("n{idx}"), NodeKind::Process, Point::default()))
                    .collect();
                let edges = pairs
                    .into_iter()
                    .map(|(source, target)| Edge::new(format!("n{source}"), format!("n{target}")))
                    .collect();
                Graph::new(nodes, edges)
            })
        })
    }

    // ===================
    // Property Test Functions
    // ===================

    /// Visible sets only grow as the step increases.
    fn check_visibility_is_monotonic(graph: Graph, a: usize, b: usize) -> Result<(), TestCaseError> {
        let (early, late) = (a.min(b), a.max(b));
        let order = compute_order(&graph);

        let early_visibility = compute_visibility(&graph, &order, early);
        let late_visibility = compute_visibility(&graph, &order, late);

        let early_ids: HashSet<&Id> = early_visibility.visible_node_ids().iter().collect();
        let late_ids: HashSet<&Id> = late_visibility.visible_node_ids().iter().collect();
        prop_assert!(early_ids.is_subset(&late_ids));
        prop_assert!(early_visibility.visible_edges().len() <= late_visibility.visible_edges().len());
        Ok(())
    }

    /// The active node is always the last visible node.
    fn check_active_is_last_visible(graph: Graph, step: usize) -> Result<(), TestCaseError> {
        let order = compute_order(&graph);
        let visibility = compute_visibility(&graph, &order, step);

        prop_assert_eq!(visibility.active_node_id(), visibility.visible_node_ids().last());
        Ok(())
    }

    /// Repeated calls agree.
    fn check_visibility_is_deterministic(graph: Graph, step: usize) -> Result<(), TestCaseError> {
        let order = compute_order(&graph);
        prop_assert_eq!(
            compute_visibility(&graph, &order, step),
            compute_visibility(&graph, &order, step)
        );
        Ok(())
    }

    // ===================
    // Proptest Wrappers
    // ===================

    proptest! {
        #[test]
        fn visibility_is_monotonic(graph in graph_strategy(), a in 0usize..12, b in 0usize..12) {
            check_visibility_is_monotonic(graph, a, b)?;
        }

        #[test]
        fn active_is_last_visible(graph in graph_strategy(), step in 0usize..12) {
            check_active_is_last_visible(graph, step)?;
        }

        #[test]
        fn visibility_is_deterministic(graph in graph_strategy(), step in 0usize..12) {
            check_visibility_is_deterministic(graph, step)?;
        }
    }
}
