//! # Command-Line Interface
//!
//! Arguments for the replay tool and their conversion into a
//! [`ReportConfig`]. Defaults live in [`crate::defaults`].

use crate::report::ReportMode;
use crate::sink::SampleLog;
use clap::Parser;
use std::path::PathBuf;

/// Latency Report - Replays load-test results into a sample log and error summary
#[derive(Parser, Debug, Clone, Default)]
#[clap(version, about, long_about = None)]
pub struct Args {
    /// Recorded results to replay, one per line (reads stdin when omitted)
    #[clap(short = 'i', long)]
    pub input: Option<PathBuf>,

    /// Sample log to append latency records to
    #[clap(short = 'o', long = "output", default_value = crate::defaults::SAMPLE_LOG)]
    pub output_file: PathBuf,

    /// Only write samples; skip the error distribution
    #[clap(long, default_value_t = false)]
    pub rate_only: bool,

    /// Discard samples instead of writing the sample log
    #[clap(long, default_value_t = false, conflicts_with = "output_file")]
    pub no_samples: bool,

    /// Write run totals as JSON to this file
    #[clap(long)]
    pub summary_json: Option<PathBuf>,

    /// Capacity of the channel between the replay reader and the collector
    #[clap(long, default_value_t = crate::defaults::CHANNEL_CAPACITY)]
    pub channel_capacity: usize,

    /// Verbose output
    #[clap(short = 'v', long, default_value_t = false)]
    pub verbose: bool,
}

/// Resolved settings for one report run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportConfig {
    pub input: Option<PathBuf>,
    pub sink: Option<SampleLog>,
    pub mode: ReportMode,
    pub summary_json: Option<PathBuf>,
    pub channel_capacity: usize,
}

impl From<&Args> for ReportConfig {
    fn from(args: &Args) -> Self {
        Self {
            input: args.input.clone(),
            sink: if args.no_samples {
                None
            } else {
                Some(SampleLog::new(&args.output_file))
            },
            mode: if args.rate_only {
                ReportMode::RateOnly
            } else {
                ReportMode::Full
            },
            summary_json: args.summary_json.clone(),
            // tokio panics on a zero-capacity channel
            channel_capacity: args.channel_capacity.max(1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::parse_from(["latency-report"]);
        let config = ReportConfig::from(&args);

        assert_eq!(config.input, None);
        assert_eq!(
            config.sink,
            Some(SampleLog::new(crate::defaults::SAMPLE_LOG))
        );
        assert_eq!(config.mode, ReportMode::Full);
        assert_eq!(config.channel_capacity, crate::defaults::CHANNEL_CAPACITY);
    }

    #[test]
    fn test_rate_only_without_samples() {
        let args = Args::parse_from([
            "latency-report",
            "--rate-only",
            "--no-samples",
            "-i",
            "results.txt",
            "--summary-json",
            "summary.json",
        ]);
        let config = ReportConfig::from(&args);

        assert_eq!(config.mode, ReportMode::RateOnly);
        assert!(config.sink.is_none());
        assert_eq!(config.input, Some(PathBuf::from("results.txt")));
        assert_eq!(config.summary_json, Some(PathBuf::from("summary.json")));
    }

    #[test]
    fn test_output_flag() {
        let long = Args::parse_from(["latency-report", "--output", "run.csv"]);
        assert_eq!(
            ReportConfig::from(&long).sink,
            Some(SampleLog::new("run.csv"))
        );

        let short = Args::parse_from(["latency-report", "-o", "short.csv"]);
        assert_eq!(short.output_file, PathBuf::from("short.csv"));

        assert!(Args::try_parse_from(["latency-report", "--output-file", "x.csv"]).is_err());
    }

    #[test]
    fn test_no_samples_conflicts_with_output() {
        let parsed = Args::try_parse_from(["latency-report", "--no-samples", "-o", "x.csv"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_zero_capacity_is_clamped() {
        let args = Args::parse_from(["latency-report", "--channel-capacity", "0"]);
        assert_eq!(ReportConfig::from(&args).channel_capacity, 1);
    }
}
