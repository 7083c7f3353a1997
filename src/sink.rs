//! Durable sample log.
//!
//! Each success sample becomes one comma-separated line:
//!
//! ```text
//! <timestamp_unix_ns>,<sequence_index>,<latency_ns>,1
//! ```
//!
//! There is no header row. The trailing `1` is a weight column reserved for
//! pre-aggregated samples and is always 1 today.

use crate::error::ReportError;
use crate::results::Sample;
use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Weight written in the fourth column of every record
pub const SAMPLE_WEIGHT: u32 = 1;

/// Append-only destination for latency samples
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleLog {
    path: PathBuf,
}

impl SampleLog {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Open the log for appending, creating it with read/write access for
    /// everyone if it does not exist yet.
    fn open(&self) -> io::Result<File> {
        let mut options = OpenOptions::new();
        options.create(true).append(true);

        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o666);
        }

        options.open(&self.path)
    }

    /// Append all samples and flush them to disk.
    ///
    /// Returns the number of records written.
    pub fn append(&self, samples: &[Sample]) -> Result<usize, ReportError> {
        let unavailable = |source| ReportError::SinkUnavailable {
            path: self.path.clone(),
            source,
        };

        let file = self.open().map_err(unavailable)?;
        let written = write_samples(BufWriter::new(file), samples).map_err(unavailable)?;

        debug!("Appended {} samples to {:?}", written, self.path);
        Ok(written)
    }
}

/// Write one record per sample to `writer`.
///
/// The writer is flushed before the batch, after it, and once more if a
/// write fails part-way so that records already accepted are not lost.
pub fn write_samples<W: Write>(mut writer: W, samples: &[Sample]) -> io::Result<usize> {
    writer.flush()?;

    for (index, sample) in samples.iter().enumerate() {
        if let Err(e) = write_record(&mut writer, index, sample) {
            let _ = writer.flush();
            return Err(e);
        }
    }

    writer.flush()?;
    Ok(samples.len())
}

fn write_record<W: Write>(writer: &mut W, index: usize, sample: &Sample) -> io::Result<()> {
    writeln!(
        writer,
        "{},{},{},{}",
        sample.timestamp_ns(),
        index,
        sample.latency_ns(),
        SAMPLE_WEIGHT
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use std::time::Duration;
    use tempfile::TempDir;

    fn sample(ts_ns: i64, latency: Duration) -> Sample {
        Sample {
            occurred_at: Utc.timestamp_nanos(ts_ns),
            latency,
        }
    }

    /// Writer that accepts a fixed number of lines and then fails
    struct FailingWriter {
        accepted: Vec<u8>,
        lines_left: usize,
        flushes: usize,
    }

    impl Write for FailingWriter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if self.lines_left == 0 {
                return Err(io::Error::new(io::ErrorKind::Other, "disk full"));
            }
            self.accepted.extend_from_slice(buf);
            if buf.contains(&b'\n') {
                self.lines_left -= 1;
            }
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            self.flushes += 1;
            Ok(())
        }
    }

    #[test]
    fn test_write_samples_format() {
        let samples = vec![
            sample(1000, Duration::from_millis(5)),
            sample(2000, Duration::from_millis(3)),
        ];
        let mut out = Vec::new();
        let written = write_samples(&mut out, &samples).unwrap();

        assert_eq!(written, 2);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "1000,0,5000000,1\n2000,1,3000000,1\n"
        );
    }

    #[test]
    fn test_write_samples_flushes_on_failure() {
        let samples = vec![
            sample(1, Duration::from_nanos(10)),
            sample(2, Duration::from_nanos(20)),
            sample(3, Duration::from_nanos(30)),
        ];
        let mut writer = FailingWriter {
            accepted: Vec::new(),
            lines_left: 1,
            flushes: 0,
        };

        assert!(write_samples(&mut writer, &samples).is_err());
        assert_eq!(String::from_utf8_lossy(&writer.accepted), "1,0,10,1\n");
        // Once before the batch, once on the failure path
        assert_eq!(writer.flushes, 2);
    }

    #[test]
    fn test_append_creates_and_appends() {
        let dir = TempDir::new().unwrap();
        let log = SampleLog::new(dir.path().join("samples.csv"));

        log.append(&[sample(10, Duration::from_nanos(100))]).unwrap();
        log.append(&[sample(20, Duration::from_nanos(200))]).unwrap();

        let text = std::fs::read_to_string(log.path()).unwrap();
        // Indices restart with every batch
        assert_eq!(text, "10,0,100,1\n20,0,200,1\n");
    }

    #[cfg(unix)]
    #[test]
    fn test_append_permissions_on_create() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let log = SampleLog::new(dir.path().join("perm.csv"));
        log.append(&[]).unwrap();

        let mode = std::fs::metadata(log.path()).unwrap().permissions().mode();
        // The process umask may clear bits, but owner read/write always survive
        assert_eq!(mode & 0o600, 0o600);
    }

    #[test]
    fn test_append_unavailable_sink() {
        let dir = TempDir::new().unwrap();
        let log = SampleLog::new(dir.path().join("missing").join("samples.csv"));

        let err = log
            .append(&[sample(1, Duration::from_nanos(1))])
            .unwrap_err();
        assert!(matches!(err, ReportError::SinkUnavailable { .. }));
    }
}
