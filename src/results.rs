//! # Result Data Model
//!
//! Producers emit a [`RequestResult`] per unit of work. The collector folds
//! them into a [`CollectedState`]: a count per error label plus the ordered
//! success samples. [`RunSummary`] is the serializable view of a finished
//! run.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// A single observation emitted by a load generator for one unit of work.
///
/// A result is either a timed success or a labeled failure. The `latency`
/// and `occurred_at` fields are only meaningful when `error` is absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestResult {
    pub error: Option<String>,
    pub latency: Duration,
    pub occurred_at: DateTime<Utc>,
}

/// How a [`RequestResult`] is counted by the collector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome<'a> {
    Success {
        latency: Duration,
        occurred_at: DateTime<Utc>,
    },
    Failure(&'a str),
}

impl RequestResult {
    /// Create a successful result
    pub fn success(latency: Duration, occurred_at: DateTime<Utc>) -> Self {
        Self {
            error: None,
            latency,
            occurred_at,
        }
    }

    /// Create a failed result carrying an error label
    pub fn failure(label: impl Into<String>) -> Self {
        Self {
            error: Some(label.into()),
            latency: Duration::ZERO,
            occurred_at: Utc.timestamp_nanos(0),
        }
    }

    /// Classify the result.
    ///
    /// An empty error label is indistinguishable from no label at all, so
    /// it classifies as a success. Producers must never report a failure
    /// with an empty label.
    pub fn classify(&self) -> Outcome<'_> {
        match self.error.as_deref() {
            Some(label) if !label.is_empty() => Outcome::Failure(label),
            _ => Outcome::Success {
                latency: self.latency,
                occurred_at: self.occurred_at,
            },
        }
    }
}

/// A latency sample recorded for one successful result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sample {
    pub occurred_at: DateTime<Utc>,
    pub latency: Duration,
}

impl Sample {
    /// Observation time as nanoseconds since the Unix epoch.
    ///
    /// Timestamps outside the range representable in an `i64` (before 1677
    /// or after 2262) are written as 0.
    pub fn timestamp_ns(&self) -> i64 {
        self.occurred_at.timestamp_nanos_opt().unwrap_or_default()
    }

    pub fn latency_ns(&self) -> u128 {
        self.latency.as_nanos()
    }
}

/// Aggregate built while draining a result stream.
///
/// Owned by the collector until the stream closes, then handed read-only to
/// the reporter. Each sample keeps its timestamp and latency together so
/// the two can never fall out of step.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectedState {
    pub error_counts: HashMap<String, u64>,
    pub samples: Vec<Sample>,
}

impl CollectedState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one result to the aggregate
    pub fn record(&mut self, result: &RequestResult) {
        match result.classify() {
            Outcome::Failure(label) => match self.error_counts.get_mut(label) {
                Some(count) => *count += 1,
                None => {
                    self.error_counts.insert(label.to_string(), 1);
                }
            },
            Outcome::Success {
                latency,
                occurred_at,
            } => self.samples.push(Sample {
                occurred_at,
                latency,
            }),
        }
    }

    pub fn success_count(&self) -> u64 {
        self.samples.len() as u64
    }

    pub fn failure_count(&self) -> u64 {
        self.error_counts.values().sum()
    }

    /// Number of results consumed to build this state
    pub fn total(&self) -> u64 {
        self.success_count() + self.failure_count()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty() && self.error_counts.is_empty()
    }
}

/// Run totals exported as JSON next to the sample log
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub total: u64,
    pub successes: u64,
    pub failures: u64,
    pub error_counts: HashMap<String, u64>,
    pub samples_written: usize,
    pub sink_error: Option<String>,
    pub generated_at: DateTime<Utc>,
}

impl RunSummary {
    pub fn new(state: &CollectedState, samples_written: usize, sink_error: Option<String>) -> Self {
        Self {
            total: state.total(),
            successes: state.success_count(),
            failures: state.failure_count(),
            error_counts: state.error_counts.clone(),
            samples_written,
            sink_error,
            generated_at: Utc::now(),
        }
    }

    /// Write the summary as pretty-printed JSON, replacing any existing file
    pub fn write_json(&self, path: &std::path::Path) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}
