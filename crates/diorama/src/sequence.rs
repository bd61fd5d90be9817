//! Presentation order over a diagram.
//!
//! The reveal order is a breadth-first walk from a start node:
//!
//! 1. The start is the first node (input order) without an incoming edge, or
//!    simply the first node when every node has one.
//! 2. Outgoing edges are scanned in input order and unvisited targets are
//!    enqueued, giving a level order whose ties follow edge declaration order.
//! 3. Nodes the walk never reaches are appended in input order, so islands
//!    are presented too.
//!
//! Edges with a missing endpoint take no part in start selection or
//! traversal. Repeated node ids are presented once, at their first position.

use std::collections::{HashMap, HashSet, VecDeque};

use indexmap::IndexSet;
use log::{debug, warn};
use serde::Serialize;

use diorama_core::{
    graph::{Edge, Graph},
    identifier::Id,
};

/// Node-centric reveal order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    start_id: Option<Id>,
    ordered_node_ids: Vec<Id>,
}

impl Order {
    /// Returns the node the walk started from, or `None` for an empty graph
    pub fn start_id(&self) -> Option<&Id> {
        self.start_id.as_ref()
    }

    /// Returns every node id exactly once, in reveal order
    pub fn ordered_node_ids(&self) -> &[Id] {
        &self.ordered_node_ids
    }

    /// Returns the number of reveal steps (one per node).
    pub fn len(&self) -> usize {
        self.ordered_node_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordered_node_ids.is_empty()
    }

    /// Returns the step at which `id` is revealed.
    pub fn position_of(&self, id: &str) -> Option<usize> {
        self.ordered_node_ids.iter().position(|node_id| node_id == id)
    }
}

/// Edge-centric reveal order.
///
/// Edges are listed by the step at which they become visible, which is the
/// later of their two endpoints' steps. Edges revealed at the same step keep
/// input order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeOrder {
    start_id: Option<Id>,
    ordered_edges: Vec<Edge>,
}

impl EdgeOrder {
    pub fn start_id(&self) -> Option<&Id> {
        self.start_id.as_ref()
    }

    pub fn ordered_edges(&self) -> &[Edge] {
        &self.ordered_edges
    }
}

/// Computes the node reveal order of `graph`.
///
/// # Examples
///
/// ```
/// # use diorama::sequence::compute_order;
/// # use diorama_core::{geometry::Point, graph::{Edge, Graph, Node}, kind::NodeKind};
/// let node = |id: &str| Node::new(id, NodeKind::Process, Point::default());
/// let graph = Graph::new(
///     vec![node("C"), node("A"), node("B")],
///     vec![Edge::new("A", "B"), Edge::new("B", "C")],
/// );
///
/// let order = compute_order(&graph);
/// assert_eq!(order.start_id().unwrap(), "A");
/// assert_eq!(order.ordered_node_ids(), ["A", "B", "C"]);
/// ```
pub fn compute_order(graph: &Graph) -> Order {
    let node_ids: IndexSet<&Id> = graph.nodes().iter().map(|node| node.id()).collect();
    let edges = traversable_edges(graph, &node_ids);

    let targets: HashSet<&Id> = edges.iter().map(|edge| edge.target()).collect();
    let start = node_ids
        .iter()
        .find(|id| !targets.contains(*id))
        .or_else(|| node_ids.first())
        .copied();

    let Some(start) = start else {
        return Order::default();
    };

    let mut successors: HashMap<&Id, Vec<&Id>> = HashMap::new();
    for edge in &edges {
        successors
            .entry(edge.source())
            .or_default()
            .push(edge.target());
    }

    let mut visited: IndexSet<&Id> = IndexSet::with_capacity(node_ids.len());
    let mut queue = VecDeque::new();
    visited.insert(start);
    queue.push_back(start);

    while let Some(current) = queue.pop_front() {
        for &next in successors.get(current).into_iter().flatten() {
            if visited.insert(next) {
                queue.push_back(next);
            }
        }
    }

    let reachable = visited.len();
    for &id in &node_ids {
        visited.insert(id);
    }

    debug!(
        start = start.as_str(),
        reachable = reachable,
        disconnected = visited.len() - reachable;
        "Computed reveal order"
    );

    Order {
        start_id: Some(start.clone()),
        ordered_node_ids: visited.into_iter().cloned().collect(),
    }
}

/// Computes the edge reveal order of `graph`.
pub fn compute_edge_order(graph: &Graph) -> EdgeOrder {
    let order = compute_order(graph);
    let steps: HashMap<&Id, usize> = order
        .ordered_node_ids
        .iter()
        .enumerate()
        .map(|(step, id)| (id, step))
        .collect();

    let mut revealed: Vec<(usize, &Edge)> = graph
        .edges()
        .iter()
        .filter_map(|edge| {
            let source = steps.get(edge.source())?;
            let target = steps.get(edge.target())?;
            Some(((*source).max(*target), edge))
        })
        .collect();
    revealed.sort_by_key(|(step, _)| *step);

    EdgeOrder {
        start_id: order.start_id,
        ordered_edges: revealed.into_iter().map(|(_, edge)| edge.clone()).collect(),
    }
}

/// Returns the edges whose endpoints both exist, warning about the others.
fn traversable_edges<'a>(graph: &'a Graph, node_ids: &IndexSet<&Id>) -> Vec<&'a Edge> {
    graph
        .edges()
        .iter()
        .filter(|edge| {
            let keep = node_ids.contains(edge.source()) && node_ids.contains(edge.target());
            if !keep {
                let edge_id = edge.effective_id();
                warn!(edge_id = edge_id.as_str(); "Ignoring edge with missing endpoint");
            }
            keep
        })
        .collect()
}


#[cfg(test)]
mod proptest_tests {
    use std::collections::HashSet;

    use proptest::prelude::*;

    use diorama_core::{geometry::Point, graph::Node, kind::NodeKind};

    use super::*;

    // ===================
    // Strategies
    // ===================

    /// Random graphs of up to 12 nodes, with edges that may dangle.
    fn graph_strategy() -> impl Strategy<Value = Graph> {
        (1usize..12).prop_flat_map(|node_count| {
            prop::collection::vec((0..node_count + 2, 0..node_count + 2), 0..24).prop_map(
                move |pairs| {
                    let nodes = (0..node_count)
                        .map(|idx| Node::new(format!("n{idx}"), NodeKind::Process, Point::default()))
                        .collect();
                    let edges = pairs
                        .into_iter()
                        .map(|(source, target)| Edge::new(format!("n{source}"), format!("n{target}")))
                        .collect();
                    Graph::new(nodes, edges)
                },
            )
        })
    }

    // ===================
    // Property Test Functions
    // ===================

    /// Every node id appears exactly once.
    fn check_order_covers_every_node(graph: Graph) -> Result<(), TestCaseError> {
        let order = compute_order(&graph);

        let expected: HashSet<&Id> = graph.nodes().iter().map(Node::id).collect();
        let seen: HashSet<&Id> = order.ordered_node_ids().iter().collect();

        prop_assert_eq!(order.len(), graph.nodes().len());
        prop_assert_eq!(seen, expected);
        Ok(())
    }

    /// The same graph always yields the same order.
    fn check_order_is_deterministic(graph: Graph) -> Result<(), TestCaseError> {
        prop_assert_eq!(compute_order(&graph), compute_order(&graph));
        prop_assert_eq!(compute_edge_order(&graph), compute_edge_order(&graph));
        Ok(())
    }

    /// The start id is the first entry of the order.
    fn check_start_leads_order(graph: Graph) -> Result<(), TestCaseError> {
        let order = compute_order(&graph);
        prop_assert_eq!(order.start_id(), order.ordered_node_ids().first());
        Ok(())
    }

    /// Edge order never contains dangling edges and never goes back in time.
    fn check_edge_order_is_monotonic(graph: Graph) -> Result<(), TestCaseError> {
        let order = compute_order(&graph);
        let edge_order = compute_edge_order(&graph);

        let mut last_step = 0;
        for edge in edge_order.ordered_edges() {
            let source = order.position_of(edge.source().as_str());
            let target = order.position_of(edge.target().as_str());
            prop_assert!(source.is_some() && target.is_some());

            let step = source.max(target).unwrap_or_default();
            prop_assert!(step >= last_step);
            last_step = step;
        }
        Ok(())
    }

    // ===================
    // Proptest Wrappers
    // ===================

    proptest! {
        #[test]
        fn order_covers_every_node(graph in graph_strategy()) {
            check_order_covers_every_node(graph)?;
        }

        #[test]
        fn order_is_deterministic(graph in graph_strategy()) {
            check_order_is_deterministic(graph)?;
        }

        #[test]
        fn start_leads_order(graph in graph_strategy()) {
            check_start_leads_order(graph)?;
        }

        #[test]
        fn edge_order_is_monotonic(graph in graph_strategy()) {
            check_edge_order_is_monotonic(graph)?;
        }
    }
}
