//! Replay of recorded results.
//!
//! The binary reads one result per line and feeds them to the reporter
//! through a channel, standing in for a live load generator:
//!
//! ```text
//! # comments and blank lines are skipped
//! ok 1700000000000000000 5000000
//! err connection reset by peer
//! ```
//!
//! `ok` lines carry the observation timestamp and latency, both in
//! nanoseconds. `err` lines carry the error label, which is the rest of the
//! line with surrounding whitespace removed.

use crate::results::RequestResult;
use anyhow::{anyhow, bail, Context, Result};
use chrono::{TimeZone, Utc};
use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;
use tracing::debug;

/// Parse one line of a recorded result stream.
///
/// Returns `Ok(None)` for blank lines and comments.
pub fn parse_line(line: &str) -> Result<Option<RequestResult>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let (kind, rest) = match line.split_once(char::is_whitespace) {
        Some((kind, rest)) => (kind, rest.trim()),
        None => (line, ""),
    };

    match kind {
        "ok" => {
            let mut fields = rest.split_whitespace();
            let timestamp_ns: i64 = fields
                .next()
                .ok_or_else(|| anyhow!("missing timestamp"))?
                .parse()
                .context("invalid timestamp")?;
            let latency_ns: u64 = fields
                .next()
                .ok_or_else(|| anyhow!("missing latency"))?
                .parse()
                .context("invalid latency")?;
            if let Some(extra) = fields.next() {
                bail!("unexpected field {:?}", extra);
            }

            Ok(Some(RequestResult::success(
                Duration::from_nanos(latency_ns),
                Utc.timestamp_nanos(timestamp_ns),
            )))
        }
        "err" => {
            if rest.is_empty() {
                bail!("failure without an error label");
            }
            Ok(Some(RequestResult::failure(rest)))
        }
        other => Err(anyhow!("unknown result kind {:?}", other)),
    }
}

/// Read results from `reader` and send them to `tx` until EOF.
///
/// The sender is dropped on return, which closes the stream for the
/// reporter. Returns the number of results sent.
pub async fn replay<R>(reader: R, tx: mpsc::Sender<RequestResult>) -> Result<usize>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    let mut line_no = 0usize;
    let mut sent = 0usize;

    while let Some(line) = lines.next_line().await? {
        line_no += 1;
        let result = parse_line(&line).with_context(|| format!("line {}", line_no))?;
        if let Some(result) = result {
            tx.send(result)
                .await
                .map_err(|_| anyhow!("result stream closed before input was exhausted"))?;
            sent += 1;
        }
    }

    debug!("Replayed {} results from {} lines", sent, line_no);
    Ok(sent)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::results::Outcome;

    #[test]
    fn test_parse_success() {
        let result = parse_line("ok 1000 5000000").unwrap().unwrap();
        assert_eq!(
            result.classify(),
            Outcome::Success {
                latency: Duration::from_millis(5),
                occurred_at: Utc.timestamp_nanos(1000),
            }
        );
    }

    #[test]
    fn test_parse_failure_keeps_spaces_in_label() {
        let result = parse_line("err   connection reset by peer  ").unwrap().unwrap();
        assert_eq!(result.classify(), Outcome::Failure("connection reset by peer"));
    }

    #[test]
    fn test_parse_skips_comments_and_blanks() {
        assert!(parse_line("").unwrap().is_none());
        assert!(parse_line("   ").unwrap().is_none());
        assert!(parse_line("# header").unwrap().is_none());
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(parse_line("ok").is_err());
        assert!(parse_line("ok 10").is_err());
        assert!(parse_line("ok ten 10").is_err());
        assert!(parse_line("ok 10 10 10").is_err());
        assert!(parse_line("err").is_err());
        assert!(parse_line("maybe 1 2").is_err());
    }

    #[tokio::test]
    async fn test_replay_closes_stream() {
        let input: &'static [u8] = b"ok 1 2\n\nerr timeout\n# done\n";
        let (tx, mut rx) = mpsc::channel(1);

        let producer = tokio::spawn(replay(input, tx));
        let mut received = Vec::new();
        while let Some(result) = rx.recv().await {
            received.push(result);
        }

        assert_eq!(producer.await.unwrap().unwrap(), 2);
        assert_eq!(received.len(), 2);
        assert_eq!(received[1].classify(), Outcome::Failure("timeout"));
    }

    #[tokio::test]
    async fn test_replay_reports_line_number() {
        let input: &[u8] = b"ok 1 2\nbogus\n";
        let (tx, _rx) = mpsc::channel(4);

        let err = replay(input, tx).await.unwrap_err();
        assert!(format!("{:#}", err).contains("line 2"));
    }
}
