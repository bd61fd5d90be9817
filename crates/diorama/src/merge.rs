//! Merging externally proposed subgraphs into an existing graph.
//!
//! A proposal arrives with its own ids and coordinates. Merging renumbers
//! its nodes from an explicit id seed, rewrites its edges onto the new ids,
//! and moves the proposal rigidly so its bounding box is centered on an
//! insertion anchor. The seed is returned so the caller can thread it into
//! the next merge.

use std::collections::{HashMap, HashSet};

use log::{debug, warn};
use serde::Serialize;

use diorama_core::{
    geometry::Point,
    graph::{Edge, Graph, Node},
    identifier::Id,
    kind::{Anchor, KindSizes},
};

use crate::{DioramaError, bounds::union_bounds};

/// The result of a merge.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Merged {
    graph: Graph,
    next_id_seed: u64,
}

impl Merged {
    pub fn new(graph: Graph, next_id_seed: u64) -> Self {
        Self {
            graph,
            next_id_seed,
        }
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// Returns the first seed not used by this merge.
    pub fn next_id_seed(&self) -> u64 {
        self.next_id_seed
    }

    pub fn into_parts(self) -> (Graph, u64) {
        (self.graph, self.next_id_seed)
    }
}

/// Hands out sequential node ids, skipping any already taken.
///
/// `next` becomes `None` once the seed space is used up.
struct IdAllocator<'a> {
    next: Option<u64>,
    taken: HashSet<&'a str>,
}

impl<'a> IdAllocator<'a> {
    fn new(seed: u64, existing: &'a Graph) -> Self {
        Self {
            next: Some(seed),
            taken: existing.nodes().iter().map(|node| node.id().as_str()).collect(),
        }
    }

    fn allocate(&mut self) -> Option<Id> {
        loop {
            let seed = self.next?;
            self.next = seed.checked_add(1);
            let id = Id::from_seed(seed);
            if !self.taken.contains(id.as_str()) {
                return Some(id);
            }
            debug!(id = id.as_str(); "Skipping seed already used by an existing node");
        }
    }
}

/// Merges `proposal` into `existing`.
///
/// Proposal nodes are renumbered from `next_id_seed` in input order and
/// translated so the center of their bounding box lands on `anchor`.
/// Proposal edges are rewritten onto the new ids; an edge whose endpoint is
/// not a proposal node is dropped. Missing edge anchors default to
/// [`Anchor::DEFAULT_SOURCE`] and [`Anchor::DEFAULT_TARGET`].
///
/// Existing nodes come first and keep their ids and positions. Existing
/// edges with a missing endpoint are dropped before the proposal is added,
/// so no edge of the result can attach to a freshly numbered node by
/// accident. No overlap resolution is performed on the result.
///
/// # Errors
///
/// Returns [`DioramaError::SeedExhausted`] when numbering the proposal would
/// need a seed past `u64::MAX`, leaving no next seed to hand back.
///
/// # Examples
///
/// ```
/// # use diorama::merge::merge_proposal;
/// # use diorama_core::{geometry::Point, graph::{Edge, Graph, Node}, kind::{KindSizes, NodeKind}};
/// let existing = Graph::new(vec![Node::new("A", NodeKind::Process, Point::default())], vec![]);
/// let proposal = Graph::new(
///     vec![
///         Node::new("X", NodeKind::Process, Point::new(0.0, 0.0)),
///         Node::new("Y", NodeKind::Process, Point::new(0.0, 100.0)),
///     ],
///     vec![Edge::new("X", "Y")],
/// );
///
/// let merged = merge_proposal(&existing, &proposal, 5, Point::new(400.0, 300.0), &KindSizes::default())?;
///
/// let ids: Vec<&str> = merged.graph().nodes().iter().map(|node| node.id().as_str()).collect();
/// assert_eq!(ids, ["A", "5", "6"]);
/// assert_eq!(merged.next_id_seed(), 7);
/// assert_eq!(merged.graph().edges()[0].source(), "5");
/// # Ok::<(), diorama::DioramaError>(())
/// ```
pub fn merge_proposal(
    existing: &Graph,
    proposal: &Graph,
    next_id_seed: u64,
    anchor: Point,
    sizes: &KindSizes,
) -> Result<Merged, DioramaError> {
    let (existing, _) = existing.clone().split_dangling();

    let offset = union_bounds(proposal.nodes(), sizes)
        .map(|bounds| anchor.sub_point(bounds.center()))
        .unwrap_or_default();

    let seed_exhausted = || DioramaError::SeedExhausted {
        seed: next_id_seed,
        needed: proposal.nodes().len(),
    };

    let mut allocator = IdAllocator::new(next_id_seed, &existing);
    let mut translation: HashMap<&Id, Id> = HashMap::new();
    let mut new_nodes = Vec::with_capacity(proposal.nodes().len());
    for node in proposal.nodes() {
        let id = allocator.allocate().ok_or_else(seed_exhausted)?;
        // Repeated proposal ids resolve to the last node declared.
        translation.insert(node.id(), id.clone());
        new_nodes.push(
            node.clone()
                .with_id(id)
                .with_position(node.position().add_point(offset)),
        );
    }
    let seed_out = allocator.next.ok_or_else(seed_exhausted)?;

    let mut taken_edge_ids: HashSet<Id> =
        existing.edges().iter().map(Edge::effective_id).collect();
    let mut new_edges = Vec::with_capacity(proposal.edges().len());
    for edge in proposal.edges() {
        let (Some(source), Some(target)) = (
            translation.get(edge.source()),
            translation.get(edge.target()),
        ) else {
            let edge_id = edge.effective_id();
            let missing = if translation.contains_key(edge.source()) {
                edge.target()
            } else {
                edge.source()
            };
            warn!(
                edge_id = edge_id.as_str(),
                missing = missing.as_str();
                "Dropping proposal edge with missing endpoint"
            );
            continue;
        };

        let id = rewrite_edge_id(edge, source, target, &taken_edge_ids);
        taken_edge_ids.insert(id.clone());

        new_edges.push(
            edge.clone()
                .with_endpoints(source.clone(), target.clone())
                .with_id(id)
                .with_source_anchor(edge.source_anchor().unwrap_or(Anchor::DEFAULT_SOURCE))
                .with_target_anchor(edge.target_anchor().unwrap_or(Anchor::DEFAULT_TARGET)),
        );
    }

    debug!(
        nodes = new_nodes.len(),
        edges = new_edges.len(),
        dropped_edges = proposal.edges().len() - new_edges.len(),
        next_id_seed = seed_out;
        "Merged proposal"
    );

    let (mut nodes, mut edges) = existing.into_parts();
    nodes.extend(new_nodes);
    edges.extend(new_edges);

    Ok(Merged::new(Graph::new(nodes, edges), seed_out))
}

/// Picks the id a proposal edge carries into the merged graph.
///
/// Ids that were absent or derived from the old endpoints are derived again
/// from the new ones. Other explicit ids survive unless taken. Anything still
/// colliding gets a numeric suffix.
fn rewrite_edge_id(edge: &Edge, source: &Id, target: &Id, taken: &HashSet<Id>) -> Id {
    if let Some(id) = edge.id() {
        let derived_from_old = Id::for_edge(edge.source(), edge.target());
        if *id != derived_from_old && !taken.contains(id) {
            return id.clone();
        }
    }

    let derived = Id::for_edge(source, target);
    if !taken.contains(&derived) {
        return derived;
    }

    let mut suffix = 2u64;
    loop {
        let id = Id::new(format!("{derived}-{suffix}"));
        if !taken.contains(&id) {
            return id;
        }
        suffix += 1;
    }
}


#[cfg(test)]
mod proptest_tests {
    use std::collections::HashSet;

    use proptest::prelude::*;

    use diorama_core::kind::NodeKind;

    use super::*;

    // ===================
    // Strategies
    // ===================

    fn graph_strategy(prefix: &'static str) -> impl Strategy<Value = Graph> {
        (0usize..6).prop_flat_map(move |node_count| {
            let positions = prop::collection::vec((-500.0f32..500.0, -500.0f32..500.0), node_count);
            // Endpoint index `node_count` names a node that does not exist.
            let edges = prop::collection::vec((0..=node_count, 0..=node_count, any::<bool>()), 0..8);
            (positions, edges).prop_map(move |(positions, pairs)| {
                let nodes = positions
                    .into_iter()
                    .enumerate()
                    .map(|(idx, (x, y))| Node::new(format!("{prefix}{idx}"), NodeKind::Process, Point::new(x, y)))
                    .collect();
                let edges = pairs
                    .into_iter()
                    .map(|(source, target, named)| {
                        let edge = Edge::new(format!("{prefix}{source}"), format!("{prefix}{target}"));
                        if named { edge.with_id("shared") } else { edge }
                    })
                    .collect();
                Graph::new(nodes, edges)
            })
        })
    }

    // ===================
    // Property Test Functions
    // ===================

    /// Number of existing edges that survive the merge.
    fn kept_edge_count(existing: &Graph) -> usize {
        existing.edges().len() - existing.dangling_edges().len()
    }

    /// Node ids stay unique and inserted edge ids never collide.
    fn check_merge_ids_are_unique(existing: Graph, proposal: Graph, seed: u64) -> Result<(), TestCaseError> {
        let merged = merge_proposal(&existing, &proposal, seed, Point::default(), &KindSizes::default()).unwrap();

        let node_ids: HashSet<&Id> = merged.graph().nodes().iter().map(Node::id).collect();
        prop_assert_eq!(node_ids.len(), merged.graph().nodes().len());

        let kept = kept_edge_count(&existing);
        let mut seen: HashSet<Id> = merged.graph().edges()[..kept].iter().map(Edge::effective_id).collect();
        for edge in &merged.graph().edges()[kept..] {
            prop_assert!(seen.insert(edge.effective_id()), "duplicate edge id {}", edge.effective_id());
        }
        Ok(())
    }

    /// Every edge of the merged graph points at a node of the merged graph,
    /// and inserted edges only connect inserted nodes.
    fn check_merge_endpoints_resolve(existing: Graph, proposal: Graph, seed: u64) -> Result<(), TestCaseError> {
        let merged = merge_proposal(&existing, &proposal, seed, Point::default(), &KindSizes::default()).unwrap();

        let all: HashSet<&Id> = merged.graph().nodes().iter().map(Node::id).collect();
        for edge in merged.graph().edges() {
            prop_assert!(all.contains(edge.source()), "dangling source {}", edge.source());
            prop_assert!(all.contains(edge.target()), "dangling target {}", edge.target());
        }

        let existing_ids = existing.node_ids();
        for edge in &merged.graph().edges()[..kept_edge_count(&existing)] {
            prop_assert!(existing_ids.contains(edge.source()));
            prop_assert!(existing_ids.contains(edge.target()));
        }

        let inserted: HashSet<&Id> = merged.graph().nodes()[existing.nodes().len()..]
            .iter()
            .map(Node::id)
            .collect();
        for edge in &merged.graph().edges()[kept_edge_count(&existing)..] {
            prop_assert!(inserted.contains(edge.source()));
            prop_assert!(inserted.contains(edge.target()));
        }
        prop_assert!(merged.next_id_seed() >= seed + proposal.nodes().len() as u64);
        Ok(())
    }

    // ===================
    // Proptest Wrappers
    // ===================

    proptest! {
        #[test]
        fn merge_ids_are_unique(
            existing in graph_strategy(""),
            proposal in graph_strategy("p"),
            seed in 0u64..8,
        ) {
            check_merge_ids_are_unique(existing, proposal, seed)?;
        }

        #[test]
        fn merge_endpoints_resolve(
            existing in graph_strategy(""),
            proposal in graph_strategy("p"),
            seed in 0u64..8,
        ) {
            check_merge_endpoints_resolve(existing, proposal, seed)?;
        }
    }
}
