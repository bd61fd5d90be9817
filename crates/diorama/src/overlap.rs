//! Overlap resolution for positioned nodes.
//!
//! The resolver runs bounded fixed-point passes. In each pass every pair
//! `(i, j)` with `i < j` in input order is tested; a colliding pair is pushed
//! apart along the axis where the boxes overlap *less*, which keeps the
//! arrangement the nodes were given and makes the smallest correction. Equal
//! overlap on both axes counts as vertical.
//!
//! Only the node further along the chosen axis moves: its near edge is placed
//! exactly `min_gap` past the far edge of the other node. When both nodes
//! share the coordinate, the later node in input order moves.
//!
//! A pass that moves nothing ends the loop. Reaching `max_passes` with
//! overlap remaining is not an error; the best layout reached is returned.

use log::{debug, trace};
use serde::Serialize;

use diorama_core::{
    geometry::{Axis, Bounds, Point, Size},
    graph::Node,
    kind::KindSizes,
};

use crate::config::{DEFAULT_MAX_PASSES, DEFAULT_MIN_GAP};

/// Parameters of the overlap resolver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlapOptions {
    min_gap: f32,
    max_passes: usize,
}

impl Default for OverlapOptions {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_GAP, DEFAULT_MAX_PASSES)
    }
}

impl OverlapOptions {
    pub fn new(min_gap: f32, max_passes: usize) -> Self {
        Self {
            min_gap,
            max_passes,
        }
    }

    pub fn min_gap(&self) -> f32 {
        self.min_gap
    }

    pub fn max_passes(&self) -> usize {
        self.max_passes
    }
}

/// Summary of one resolver run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverlapReport {
    passes: usize,
    moves: usize,
    converged: bool,
}

impl OverlapReport {
    /// Number of passes executed, including the final quiet pass.
    pub fn passes(&self) -> usize {
        self.passes
    }

    /// Total number of node moves across all passes.
    pub fn moves(&self) -> usize {
        self.moves
    }

    /// True if a pass completed without moving any node.
    pub fn converged(&self) -> bool {
        self.converged
    }
}

/// Separates overlapping nodes.
///
/// Returns the nodes in input order with the same ids and sizes; only
/// positions change.
///
/// # Examples
///
/// ```
/// # use diorama::overlap::{OverlapOptions, resolve_overlaps};
/// # use diorama_core::{geometry::{Point, Size}, graph::Node, kind::{KindSizes, NodeKind}};
/// let size = Size::new(100.0, 50.0);
/// let nodes = [
///     Node::new("P", NodeKind::Process, Point::new(0.0, 0.0)).with_size(size),
///     Node::new("Q", NodeKind::Process, Point::new(50.0, 0.0)).with_size(size),
/// ];
///
/// let resolved = resolve_overlaps(&nodes, &KindSizes::default(), OverlapOptions::default());
///
/// // Equal overlap on both axes: Q is pushed down below P plus the gap.
/// assert_eq!(resolved[1].position(), Point::new(50.0, 70.0));
/// assert_eq!(resolved[0].position(), Point::new(0.0, 0.0));
/// ```
pub fn resolve_overlaps(nodes: &[Node], sizes: &KindSizes, options: OverlapOptions) -> Vec<Node> {
    resolve_overlaps_with_report(nodes, sizes, options).0
}

/// Separates overlapping nodes and reports how the run went.
pub fn resolve_overlaps_with_report(
    nodes: &[Node],
    sizes: &KindSizes,
    options: OverlapOptions,
) -> (Vec<Node>, OverlapReport) {
    let extents: Vec<Size> = nodes.iter().map(|node| node.effective_size(sizes)).collect();
    let mut positions: Vec<Point> = nodes.iter().map(Node::position).collect();
    let mut report = OverlapReport::default();

    for _ in 0..options.max_passes {
        report.passes += 1;
        let mut moved = false;

        for i in 0..positions.len() {
            for j in (i + 1)..positions.len() {
                if separate_pair(&mut positions, &extents, i, j, options.min_gap) {
                    trace!(
                        pass = report.passes,
                        first = nodes[i].id().as_str(),
                        second = nodes[j].id().as_str();
                        "Separated overlapping nodes"
                    );
                    report.moves += 1;
                    moved = true;
                }
            }
        }

        if !moved {
            report.converged = true;
            break;
        }
    }

    if report.converged {
        debug!(nodes = nodes.len(), passes = report.passes, moves = report.moves; "Overlaps resolved");
    } else {
        debug!(
            nodes = nodes.len(),
            passes = report.passes,
            moves = report.moves;
            "Overlap pass bound reached, returning best layout"
        );
    }

    let resolved = nodes
        .iter()
        .zip(positions)
        .map(|(node, position)| node.clone().with_position(position))
        .collect();

    (resolved, report)
}

/// Pushes nodes `i` and `j` apart if their boxes collide.
///
/// Returns true if a node moved.
fn separate_pair(
    positions: &mut [Point],
    extents: &[Size],
    i: usize,
    j: usize,
    min_gap: f32,
) -> bool {
    let first = Bounds::new_from_top_left(positions[i], extents[i]);
    let second = Bounds::new_from_top_left(positions[j], extents[j]);

    let (overlap_x, overlap_y) = first.overlap_extents(&second);
    if !(overlap_x > 0.0 && overlap_y > 0.0) {
        return false;
    }

    let axis = if overlap_x < overlap_y {
        Axis::Horizontal
    } else {
        Axis::Vertical
    };

    let (anchor_box, mover) = if positions[j].along(axis) >= positions[i].along(axis) {
        (first, j)
    } else {
        (second, i)
    };

    let target = anchor_box.max_along(axis) + min_gap;
    positions[mover] = positions[mover].with_along(axis, target);
    true
}
