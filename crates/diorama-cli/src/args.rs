//! Command-line argument definitions for the Diorama CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Global options control configuration file selection,
//! output destination, and logging verbosity; the [`Command`] picks the
//! engine operation to run.

use clap::{Parser, Subcommand};

/// Command-line arguments for the Diorama engine
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Path to the output JSON file (stdout when omitted)
    #[arg(short, long, global = true)]
    pub output: Option<String>,

    /// Path to configuration file (TOML)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,
}

/// Engine operations exposed on the command line
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Print the breadth-first reveal order of a graph
    Order {
        /// Path to the graph JSON file
        input: String,

        /// Print the edge reveal order instead of the node order
        #[arg(long)]
        edges: bool,
    },

    /// Print what is visible at one presentation step
    Step {
        /// Path to the graph JSON file
        input: String,

        /// Zero-based step index; clamped to the last step
        step: usize,
    },

    /// Push overlapping nodes apart and print the resulting graph
    Resolve {
        /// Path to the graph JSON file
        input: String,
    },

    /// Print the bounding box of a graph
    Bounds {
        /// Path to the graph JSON file
        input: String,
    },

    /// Merge a proposed subgraph into an existing graph
    Merge {
        /// Path to the existing graph JSON file
        existing: String,

        /// Path to the proposal graph JSON file
        proposal: String,

        /// First sequence number used for new node ids
        #[arg(long, default_value_t = 0)]
        seed: u64,

        /// X coordinate the proposal is centered on
        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
        anchor_x: f32,

        /// Y coordinate the proposal is centered on
        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
        anchor_y: f32,

        /// Run overlap resolution on the merged graph
        #[arg(long)]
        resolve: bool,
    },
}
