//! # Report Generation
//!
//! Turns a drained result stream into its two outputs: the sample log on
//! disk and the error distribution on a diagnostic writer (stdout unless
//! configured otherwise).
//!
//! Both entry points, [`print_report`] and [`print_rate`], spawn a single
//! tokio task that drains the stream to completion and only then writes
//! output, on the blocking pool. They return a [`ReportHandle`] immediately; awaiting it tells the
//! caller that every sample has been flushed.
//!
//! ## Failure Handling
//!
//! A sample log that cannot be opened or written never stops the drain and
//! never suppresses the error summary. The failure is logged and returned
//! in [`ReportOutcome::sink_error`].

use crate::{
    collector::{drain, ResultSource},
    error::ReportError,
    results::{CollectedState, RunSummary},
    sink::SampleLog,
    utils::format_duration,
};
use std::io::{self, Write};
use std::time::Instant;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Which outputs a report produces once the stream is drained
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportMode {
    /// Write samples, then print the error distribution if there is one
    Full,
    /// Write samples only; the error distribution is never printed
    RateOnly,
}

/// Outputs to produce for one run
pub struct Reporter {
    sink: Option<SampleLog>,
    diagnostics: Box<dyn Write + Send>,
}

/// What a finished report task produced
#[derive(Debug)]
pub struct ReportOutcome {
    pub mode: ReportMode,
    pub summary: RunSummary,
    pub sink_error: Option<ReportError>,
    pub summary_error: Option<ReportError>,
}

/// Completion signal for a running report.
///
/// [`wait`](ReportHandle::wait) consumes the handle, so completion is
/// observed exactly once.
#[derive(Debug)]
pub struct ReportHandle {
    task: JoinHandle<Result<ReportOutcome, ReportError>>,
}

impl ReportHandle {
    /// Wait for the drain and every output write to finish
    pub async fn wait(self) -> Result<ReportOutcome, ReportError> {
        self.task
            .await
            .map_err(|e| ReportError::TaskFailed(e.to_string()))?
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Reporter {
    /// Create a reporter that prints diagnostics to stdout.
    ///
    /// Without a sink, samples are collected and then discarded.
    pub fn new(sink: Option<SampleLog>) -> Self {
        Self {
            sink,
            diagnostics: Box::new(io::stdout()),
        }
    }

    /// Send the error distribution to `writer` instead of stdout
    pub fn with_diagnostics<W: Write + Send + 'static>(mut self, writer: W) -> Self {
        self.diagnostics = Box::new(writer);
        self
    }

    /// Drain `source` and report on a background task.
    ///
    /// The stream is only finished when every producer drops its sender;
    /// until then the task stays suspended on the next receive. Output is
    /// written on the blocking pool once the drain has finished.
    pub fn spawn<S>(self, mut source: S, mode: ReportMode) -> ReportHandle
    where
        S: ResultSource + 'static,
    {
        let task = tokio::spawn(async move {
            let started = Instant::now();
            let state = drain(&mut source).await;
            let outcome = tokio::task::spawn_blocking(move || self.finish(&state, mode))
                .await
                .map_err(|e| ReportError::TaskFailed(e.to_string()))?;

            info!(
                "Report finished: {} successes, {} failures, {} samples written in {}",
                outcome.summary.successes,
                outcome.summary.failures,
                outcome.summary.samples_written,
                format_duration(started.elapsed())
            );
            Ok::<_, ReportError>(outcome)
        });

        ReportHandle { task }
    }

    /// Produce the outputs for an already-finalized state
    pub fn finish(mut self, state: &CollectedState, mode: ReportMode) -> ReportOutcome {
        let (samples_written, sink_error) = match self.sink {
            Some(ref sink) => match sink.append(&state.samples) {
                Ok(written) => (written, None),
                Err(e) => {
                    warn!("Dropping {} samples: {}", state.samples.len(), e);
                    (0, Some(e))
                }
            },
            None => {
                debug!("No sample log configured, discarding {} samples", state.samples.len());
                (0, None)
            }
        };

        let summary_error = match mode {
            ReportMode::Full => write_error_summary(state, &mut self.diagnostics)
                .err()
                .map(|e| {
                    warn!("Could not print error distribution: {}", e);
                    ReportError::SummaryOutput(e)
                }),
            ReportMode::RateOnly => None,
        };

        ReportOutcome {
            mode,
            summary: RunSummary::new(
                state,
                samples_written,
                sink_error.as_ref().map(|e| e.to_string()),
            ),
            sink_error,
            summary_error,
        }
    }
}

/// Drain `source`, write its samples, then print the error distribution
pub fn print_report<S>(source: S, sink: Option<SampleLog>) -> ReportHandle
where
    S: ResultSource + 'static,
{
    Reporter::new(sink).spawn(source, ReportMode::Full)
}

/// Drain `source` and write its samples without printing errors
pub fn print_rate<S>(source: S, sink: Option<SampleLog>) -> ReportHandle
where
    S: ResultSource + 'static,
{
    Reporter::new(sink).spawn(source, ReportMode::RateOnly)
}

/// Print the count of each distinct error label.
///
/// Writes nothing when no failures were collected. Label order follows the
/// map and is not stable between runs.
pub fn write_error_summary<W: Write + ?Sized>(
    state: &CollectedState,
    writer: &mut W,
) -> io::Result<()> {
    if state.error_counts.is_empty() {
        return Ok(());
    }

    writeln!(writer, "\nError distribution:")?;
    for (label, count) in &state.error_counts {
        writeln!(writer, "  [{}]\t{}", count, label)?;
    }
    writer.flush()
}
