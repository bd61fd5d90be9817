//! Edit commands applied to a graph.
//!
//! Editors express changes as [`Command`] values and fold them over a graph
//! with [`apply`]. Nodes never carry callbacks.

use log::debug;
use serde::{Deserialize, Serialize};

use diorama_core::{
    geometry::Point,
    graph::{Graph, Node},
    identifier::Id,
};

/// A single edit to a graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Command {
    /// Replace the label of a node.
    UpdateNodeLabel { id: Id, text: String },
    /// Move a node's top-left corner to `position`.
    MoveNode { id: Id, position: Point },
    /// Remove a node along with every edge touching it.
    RemoveNode { id: Id },
}

impl Command {
    /// Returns the id of the node this command targets.
    pub fn target(&self) -> &Id {
        match self {
            Self::UpdateNodeLabel { id, .. } | Self::MoveNode { id, .. } | Self::RemoveNode { id } => id,
        }
    }
}

/// Returns `graph` with `command` applied.
///
/// A command naming a node that does not exist leaves the graph unchanged.
/// When node ids repeat, every node with the id is affected.
///
/// # Examples
///
/// ```
/// # use diorama::command::{Command, apply};
/// # use diorama_core::{geometry::Point, graph::{Graph, Node}, kind::NodeKind};
/// let graph = Graph::new(vec![Node::new("a", NodeKind::Process, Point::default())], vec![]);
///
/// let edited = apply(&graph, &Command::UpdateNodeLabel { id: "a".into(), text: "Start".into() });
/// assert_eq!(edited.node("a").unwrap().label(), Some("Start"));
/// ```
pub fn apply(graph: &Graph, command: &Command) -> Graph {
    let target = command.target();
    if !graph.contains_node(target.as_str()) {
        debug!(id = target.as_str(); "Command targets an unknown node, ignoring");
        return graph.clone();
    }

    let (nodes, edges) = graph.clone().into_parts();
    match command {
        Command::UpdateNodeLabel { id, text } => {
            let nodes = map_matching(nodes, id, |node| node.with_label(text.clone()));
            Graph::new(nodes, edges)
        }
        Command::MoveNode { id, position } => {
            let nodes = map_matching(nodes, id, |node| node.with_position(*position));
            Graph::new(nodes, edges)
        }
        Command::RemoveNode { id } => {
            let nodes = nodes.into_iter().filter(|node| node.id() != id).collect();
            let edges = edges
                .into_iter()
                .filter(|edge| edge.source() != id && edge.target() != id)
                .collect();
            Graph::new(nodes, edges)
        }
    }
}

/// Applies `commands` in order.
pub fn apply_all<'a, I>(graph: &Graph, commands: I) -> Graph
where
    I: IntoIterator<Item = &'a Command>,
{
    commands
        .into_iter()
        .fold(graph.clone(), |graph, command| apply(&graph, command))
}

fn map_matching(nodes: Vec<Node>, id: &Id, edit: impl Fn(Node) -> Node) -> Vec<Node> {
    nodes
        .into_iter()
        .map(|node| if node.id() == id { edit(node) } else { node })
        .collect()
}
