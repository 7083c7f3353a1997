//! Report pipeline errors.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while reporting a drained result stream.
///
/// None of these abort a drain. They are logged and carried in the
/// [`ReportOutcome`](crate::report::ReportOutcome) so the caller can decide
/// whether an incomplete sample log matters.
#[derive(Debug, Error)]
pub enum ReportError {
    /// The sample log could not be opened, written or flushed
    #[error("sample log {path:?} is unavailable: {source}")]
    SinkUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The error summary could not be written to the diagnostic output
    #[error("failed to write error summary: {0}")]
    SummaryOutput(#[source] std::io::Error),

    /// The background report task panicked or was aborted
    #[error("report task failed: {0}")]
    TaskFailed(String),
}
