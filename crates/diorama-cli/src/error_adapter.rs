//! Error adapter for converting DioramaError to miette diagnostics.
//!
//! This module provides the bridge between the library's standard error types
//! and miette's rich diagnostic formatting used in the CLI. Graph decoding
//! errors are rendered with a label pointing at the offending position in the
//! JSON source.

use std::fmt;

use miette::{
    Diagnostic as MietteDiagnostic, GraphicalReportHandler, GraphicalTheme, LabeledSpan, SourceSpan,
};
use serde_json::error::Category;

use diorama::DioramaError;

/// Wraps a [`DioramaError`] so miette can render it.
pub struct ErrorAdapter(pub DioramaError);

impl fmt::Debug for ErrorAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        std::error::Error::source(&self.0)
    }
}

impl MietteDiagnostic for ErrorAdapter {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match &self.0 {
            DioramaError::Io(_) => "diorama::io",
            DioramaError::Parse { .. } => "diorama::parse",
            DioramaError::Config(_) => "diorama::config",
            DioramaError::Output(_) => "diorama::output",
            DioramaError::SeedExhausted { .. } => "diorama::merge",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let help = match &self.0 {
            DioramaError::Parse { .. } => "a graph is a JSON object with `nodes` and `edges` arrays",
            DioramaError::Config(_) => "fix the file named above, or pass --config <path>",
            DioramaError::SeedExhausted { needed, .. } => {
                return Some(Box::new(format!(
                    "pass a --seed of at most {} so {needed} new id(s) and the next seed fit",
                    u64::MAX - *needed as u64
                )));
            }
            _ => return None,
        };
        Some(Box::new(help))
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        match &self.0 {
            DioramaError::Parse { src, .. } => Some(src as &dyn miette::SourceCode),
            _ => None,
        }
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let DioramaError::Parse { err, src } = &self.0 else {
            return None;
        };

        let span = json_error_span(src, err.line(), err.column());
        let label = LabeledSpan::new_primary_with_span(Some(label_message(err).to_string()), span);
        Some(Box::new(std::iter::once(label)))
    }
}

/// Renders the diagnostic as miette's graphical report, without colors.
pub fn render_report(adapter: &ErrorAdapter) -> String {
    let mut rendered = String::new();
    let handler = GraphicalReportHandler::new_themed(GraphicalTheme::unicode_nocolor());
    if handler.render_report(&mut rendered, adapter).is_err() {
        // Fall back to the plain message so the failure is never silent
        rendered = adapter.to_string();
    }
    rendered
}

/// Short label text for a decoding error, by category.
fn label_message(err: &serde_json::Error) -> &'static str {
    match err.classify() {
        Category::Eof => "input ends here",
        Category::Syntax => "invalid JSON here",
        _ => "unexpected value here",
    }
}

/// Convert a 1-based line and column from serde_json into a byte span.
///
/// Column 0 is treated as the start of the line. The span is clamped to the
/// source.
fn json_error_span(src: &str, line: usize, column: usize) -> SourceSpan {
    let line_start: usize = src
        .split_inclusive('\n')
        .take(line.saturating_sub(1))
        .map(str::len)
        .sum();
    let offset = (line_start + column.saturating_sub(1)).min(src.len());
    let len = usize::from(offset < src.len());
    SourceSpan::new(offset.into(), len)
}
