//! CLI logic for the Diorama engine.
//!
//! Each subcommand reads graph JSON files, runs one engine operation, and
//! writes the result as pretty-printed JSON.

pub mod error_adapter;

mod args;
mod config;

pub use args::{Args, Command};
pub use error_adapter::ErrorAdapter;

use std::{
    fs,
    io::{self, Write},
};

use log::info;
use serde::Serialize;

use diorama::{
    DioramaError, Engine,
    geometry::Point,
    graph::Graph,
    merge::Merged,
    overlap::OverlapReport,
};

/// Output of the `resolve` subcommand.
#[derive(Serialize)]
struct Resolved {
    graph: Graph,
    report: OverlapReport,
}

/// Run the Diorama CLI application
///
/// # Arguments
///
/// * `args` - Command-line arguments
///
/// # Errors
///
/// Returns `DioramaError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Graph decoding errors
/// - Node id seed exhaustion during a merge
/// - Output encoding errors
pub fn run(args: &Args) -> Result<(), DioramaError> {
    let engine_config = config::load_config(args.config.as_ref())?;
    let engine = Engine::new(engine_config);

    match &args.command {
        Command::Order { input, edges } => {
            info!(input_path = input, edges = *edges; "Computing reveal order");
            let graph = read_graph(&engine, input)?;
            if *edges {
                write_output(&engine.compute_edge_order(&graph), args.output.as_deref())
            } else {
                write_output(&engine.compute_order(&graph), args.output.as_deref())
            }
        }
        Command::Step { input, step } => {
            info!(input_path = input, step = *step; "Computing visibility");
            let graph = read_graph(&engine, input)?;
            write_output(&engine.compute_visibility(&graph, *step), args.output.as_deref())
        }
        Command::Resolve { input } => {
            info!(input_path = input; "Resolving overlaps");
            let (graph, _) = read_graph(&engine, input)?.split_dangling();
            let (nodes, report) = engine.resolve_overlaps_with_report(graph.nodes());
            info!(
                passes = report.passes(),
                moves = report.moves(),
                converged = report.converged();
                "Overlap resolution finished"
            );

            let (_, edges) = graph.into_parts();
            let resolved = Resolved {
                graph: Graph::new(nodes, edges),
                report,
            };
            write_output(&resolved, args.output.as_deref())
        }
        Command::Bounds { input } => {
            info!(input_path = input; "Computing bounds");
            let graph = read_graph(&engine, input)?;
            write_output(&engine.compute_bounds(&graph), args.output.as_deref())
        }
        Command::Merge {
            existing,
            proposal,
            seed,
            anchor_x,
            anchor_y,
            resolve,
        } => {
            info!(existing_path = existing, proposal_path = proposal; "Merging proposal");
            let existing = read_graph(&engine, existing)?;
            let proposal = read_graph(&engine, proposal)?;

            let merged = engine.merge_proposal(
                &existing,
                &proposal,
                *seed,
                Point::new(*anchor_x, *anchor_y),
            )?;

            if *resolve {
                let (graph, next_id_seed) = merged.into_parts();
                let merged = Merged::new(engine.resolve_graph(&graph), next_id_seed);
                write_output(&merged, args.output.as_deref())
            } else {
                write_output(&merged, args.output.as_deref())
            }
        }
    }
}

fn read_graph(engine: &Engine, path: &str) -> Result<Graph, DioramaError> {
    let source = fs::read_to_string(path)?;
    engine.parse(&source)
}

/// Writes `value` as pretty JSON to `output`, or to stdout when `None`.
fn write_output<T: Serialize>(value: &T, output: Option<&str>) -> Result<(), DioramaError> {
    let mut json = serde_json::to_string_pretty(value).map_err(DioramaError::Output)?;
    json.push('\n');

    match output {
        Some(path) => {
            fs::write(path, json)?;
            info!(output_file = path; "Output written");
        }
        None => io::stdout().lock().write_all(json.as_bytes())?,
    }

    Ok(())
}
