//! # Latency Report Library
//!
//! Collects the per-request results of a load-testing or benchmarking run
//! and turns them into two outputs:
//!
//! - a **sample log**: one `timestamp,index,latency,1` line per successful
//!   request, appended to a file for offline percentile analysis
//! - an **error distribution**: the count of each distinct error label,
//!   printed once the run is over
//!
//! ## Architecture Overview
//!
//! - `results`: the `RequestResult` observation and the `CollectedState` aggregate
//! - `collector`: the `ResultSource` abstraction and the `drain` loop
//! - `sink`: the append-only sample log
//! - `report`: background report tasks and the error distribution
//! - `input`: replay of recorded results for the command-line tool
//! - `cli`: argument parsing and report configuration
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use latency_report::{print_report, RequestResult, SampleLog};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
//!     let handle = print_report(rx, Some(SampleLog::new("samples.csv")));
//!
//!     tx.send(RequestResult::success(Duration::from_millis(3), chrono::Utc::now()))?;
//!     tx.send(RequestResult::failure("timeout"))?;
//!     drop(tx);
//!
//!     let outcome = handle.wait().await?;
//!     println!("{} samples written", outcome.summary.samples_written);
//!     Ok(())
//! }
//! ```
//!
//! The report only finishes once every sender has been dropped.

/// Command-line interface and report configuration
///
/// Parses arguments with clap and resolves them into a `ReportConfig`:
/// - Input file selection, falling back to stdin
/// - Sample log path, or discarding samples entirely
/// - Full or rate-only report mode
/// - Optional JSON summary output
pub mod cli;

/// Draining a result stream into a `CollectedState`
///
/// Defines the `ResultSource` abstraction over many-producer,
/// single-consumer queues and the `drain` loop that consumes a source
/// until every producer has closed it.
pub mod collector;

/// Error types for the report pipeline
///
/// `ReportError` covers an unavailable sample log, a failed error summary
/// write, and a report task that panicked. None of these interrupt a drain.
pub mod error;

/// Parsing recorded result streams for replay
///
/// Turns `ok`/`err` lines into `RequestResult` values and feeds them
/// through a channel, closing it at end of input.
pub mod input;

/// Log output for the command-line tool
///
/// Installs the tracing subscriber on stderr and provides a terse colored
/// formatter for non-verbose runs.
pub mod logging;

/// Background report tasks, sample output and the error distribution
///
/// Holds the two entry points, `print_report` and `print_rate`, and the
/// `ReportHandle` completion signal they return.
pub mod report;

/// Result and aggregate types
///
/// `RequestResult` is what producers emit; `CollectedState` is what a drain
/// builds; `RunSummary` is the exported view of a finished run.
pub mod results;

/// The append-only sample log
///
/// Writes one `timestamp,index,latency,1` record per success and flushes
/// around every batch.
pub mod sink;

/// Formatting helpers for log output
pub mod utils;

pub use collector::{drain, ResultSource};
pub use error::ReportError;
pub use report::{print_rate, print_report, ReportHandle, ReportMode, ReportOutcome, Reporter};
pub use results::{CollectedState, RequestResult, RunSummary, Sample};
pub use sink::SampleLog;

/// The current version of the latency report tool
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default configuration values
pub mod defaults {
    /// Default sample log file name
    pub const SAMPLE_LOG: &str = "latency_samples.csv";

    /// Default capacity of the replay channel
    ///
    /// Large enough that the replay reader rarely waits on the collector.
    pub const CHANNEL_CAPACITY: usize = 1024;
}
