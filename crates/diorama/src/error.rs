//! Error types for Diorama operations.
//!
//! Malformed or degenerate graphs never fail: they produce degraded but valid
//! results. [`DioramaError`] covers decoding graph payloads, loading
//! configuration, and running out of node id seeds during a merge.

use std::io;

use thiserror::Error;

/// The main error type for Diorama operations.
///
/// # Diagnostic Variants
///
/// The `Parse` variant keeps the source text next to the decoding error so a
/// caller can point at the offending line and column.
#[derive(Debug, Error)]
pub enum DioramaError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid graph: {err}")]
    Parse { err: serde_json::Error, src: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Output error: {0}")]
    Output(#[source] serde_json::Error),

    #[error("Id seed exhausted: {needed} proposal node(s) cannot be numbered from seed {seed}")]
    SeedExhausted { seed: u64, needed: usize },
}

impl DioramaError {
    /// Create a new `Parse` error with the associated source text.
    pub fn new_parse_error(err: serde_json::Error, src: impl Into<String>) -> Self {
        Self::Parse {
            err,
            src: src.into(),
        }
    }
}
