//! Diorama - A presentation and layout engine for node/edge diagrams.
//!
//! Bounding boxes, overlap resolution, breadth-first reveal sequencing,
//! per-step visibility, and merging of externally proposed subgraphs. Every
//! operation is a pure function of its inputs; the caller decides when to
//! recompute.

pub mod bounds;
pub mod command;
pub mod config;
pub mod merge;
pub mod overlap;
pub mod sequence;
pub mod visibility;

mod error;

pub use diorama_core::{geometry, graph, identifier, kind};

pub use error::DioramaError;

use log::{debug, info, trace};

use diorama_core::{
    geometry::{Bounds, Point},
    graph::{Graph, Node},
};

use config::EngineConfig;
use merge::Merged;
use overlap::OverlapReport;
use sequence::{EdgeOrder, Order};
use visibility::{Presentation, Visibility};

/// Entry point for decoding graphs and running the engine components.
///
/// Holds an [`EngineConfig`] and threads it into every component, so
/// callers do not have to pass sizes and overlap options around.
///
/// # Examples
///
/// ```rust
/// use diorama::{Engine, config::EngineConfig};
///
/// let source = r#"{
///     "nodes": [
///         {"id": "A", "kind": "process", "position": {"x": 0, "y": 0}},
///         {"id": "B", "kind": "decision", "position": {"x": 0, "y": 120}}
///     ],
///     "edges": [{"source": "A", "target": "B"}]
/// }"#;
///
/// let engine = Engine::new(EngineConfig::default());
/// let graph = engine.parse(source).expect("Failed to parse");
///
/// let order = engine.compute_order(&graph);
/// assert_eq!(order.ordered_node_ids(), ["A", "B"]);
///
/// // Or use default config
/// let engine = Engine::default();
/// ```
#[derive(Debug, Default)]
pub struct Engine {
    config: EngineConfig,
}

impl Engine {
    /// Create a new engine with the given configuration.
    ///
    /// # Arguments
    ///
    /// * `config` - Engine configuration including layout and node size settings
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Decode a graph from its JSON wire form.
    ///
    /// # Arguments
    ///
    /// * `source` - JSON text of the form `{"nodes": [...], "edges": [...]}`
    ///
    /// # Errors
    ///
    /// Returns [`DioramaError::Parse`] carrying the source text when the
    /// payload is not a valid graph.
    pub fn parse(&self, source: &str) -> Result<Graph, DioramaError> {
        info!("Parsing graph");

        let graph: Graph = serde_json::from_str(source)
            .map_err(|err| DioramaError::new_parse_error(err, source))?;

        debug!(
            nodes = graph.nodes().len(),
            edges = graph.edges().len();
            "Graph parsed successfully"
        );
        trace!(graph:?; "Parsed graph");

        Ok(graph)
    }

    /// Compute the box enclosing every node of `graph`.
    ///
    /// An empty graph yields the configured fallback box.
    pub fn compute_bounds(&self, graph: &Graph) -> Bounds {
        bounds::union_bounds(graph.nodes(), self.config.sizes())
            .unwrap_or_else(|| self.config.layout().empty_bounds())
    }

    /// Push overlapping nodes apart. See [`overlap::resolve_overlaps`].
    pub fn resolve_overlaps(&self, nodes: &[Node]) -> Vec<Node> {
        self.resolve_overlaps_with_report(nodes).0
    }

    /// Push overlapping nodes apart, also reporting how the run went.
    pub fn resolve_overlaps_with_report(&self, nodes: &[Node]) -> (Vec<Node>, OverlapReport) {
        overlap::resolve_overlaps_with_report(
            nodes,
            self.config.sizes(),
            self.config.layout().overlap_options(),
        )
    }

    /// Return `graph` with its nodes passed through the overlap resolver.
    ///
    /// Edges with a missing endpoint are dropped from the result.
    pub fn resolve_graph(&self, graph: &Graph) -> Graph {
        let (graph, _) = graph.clone().split_dangling();
        let nodes = self.resolve_overlaps(graph.nodes());
        let (_, edges) = graph.into_parts();
        Graph::new(nodes, edges)
    }

    pub fn compute_order(&self, graph: &Graph) -> Order {
        sequence::compute_order(graph)
    }

    pub fn compute_edge_order(&self, graph: &Graph) -> EdgeOrder {
        sequence::compute_edge_order(graph)
    }

    /// Compute what is visible at `step`, deriving the order from `graph`.
    pub fn compute_visibility(&self, graph: &Graph, step: usize) -> Visibility {
        let order = sequence::compute_order(graph);
        visibility::compute_visibility(graph, &order, step)
    }

    /// Merge `proposal` into `existing`, centering it on `anchor`.
    ///
    /// See [`merge::merge_proposal`] for the id and edge rules.
    ///
    /// # Errors
    ///
    /// Returns [`DioramaError::SeedExhausted`] when the proposal cannot be
    /// numbered from `next_id_seed`.
    pub fn merge_proposal(
        &self,
        existing: &Graph,
        proposal: &Graph,
        next_id_seed: u64,
        anchor: Point,
    ) -> Result<Merged, DioramaError> {
        info!(
            proposal_nodes = proposal.nodes().len(),
            next_id_seed;
            "Merging proposal"
        );
        merge::merge_proposal(existing, proposal, next_id_seed, anchor, self.config.sizes())
    }

    /// Start a step-by-step presentation of `graph`.
    pub fn present(&self, graph: Graph) -> Presentation {
        Presentation::new(graph)
    }
}
