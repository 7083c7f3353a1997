//! # Latency Report - Main Entry Point
//!
//! Replays a recorded result stream through the report pipeline:
//!
//! 1. **Initialize logging**: terse colored output on stderr, `RUST_LOG` aware
//! 2. **Parse arguments**: resolve the input, sample log and report mode
//! 3. **Start the report**: spawn the drain-and-report task
//! 4. **Replay results**: parse each input line and send it to the collector
//! 5. **Wait for completion**: the report finishes once the input is exhausted
//! 6. **Export totals**: optionally write the run summary as JSON

use anyhow::{Context, Result};
use clap::Parser;
use latency_report::{
    cli::{Args, ReportConfig},
    input::replay,
    logging::init_logging,
    report::Reporter,
};
use tokio::io::{AsyncBufRead, BufReader};
use tokio::sync::mpsc;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let config = ReportConfig::from(&args);
    info!("Configuration: {:?}", config);

    let reader: Box<dyn AsyncBufRead + Unpin + Send> = match config.input {
        Some(ref path) => {
            let file = tokio::fs::File::open(path)
                .await
                .with_context(|| format!("Failed to open input {:?}", path))?;
            Box::new(BufReader::new(file))
        }
        None => Box::new(BufReader::new(tokio::io::stdin())),
    };

    let (tx, rx) = mpsc::channel(config.channel_capacity);
    let handle = Reporter::new(config.sink.clone()).spawn(rx, config.mode);

    // The report task keeps draining until `replay` drops the sender,
    // including when replay stops early on a parse error.
    let replayed = replay(reader, tx).await;
    let outcome = handle.wait().await?;

    if let Some(ref e) = outcome.sink_error {
        warn!("Sample log is incomplete: {}", e);
    }

    if let Some(ref path) = config.summary_json {
        outcome
            .summary
            .write_json(path)
            .with_context(|| format!("Failed to write summary to {:?}", path))?;
        info!("Summary written to: {:?}", path);
    }

    match replayed {
        Ok(count) => {
            info!("Replayed {} results", count);
            Ok(())
        }
        Err(e) => {
            error!("Replay stopped early: {:#}", e);
            Err(e)
        }
    }
}
