//! # Formatting Helpers
//!
//! Human-readable rendering for log lines. Machine-readable output (the
//! sample log and JSON summary) always uses raw integer nanoseconds.

use std::time::Duration;

/// Format a duration with the largest unit that keeps the value readable
///
/// ## Unit Selection
///
/// - below 1µs: whole nanoseconds (`"750ns"`)
/// - below 1ms: microseconds with two decimals (`"1.25μs"`)
/// - below 1s: milliseconds with two decimals (`"2.50ms"`)
/// - below 1 minute: seconds with two decimals (`"5.25s"`)
/// - otherwise minutes and seconds, plus hours past 60 minutes
///
/// ```rust
/// # use latency_report::utils::format_duration;
/// # use std::time::Duration;
/// assert_eq!(format_duration(Duration::from_nanos(750)), "750ns");
/// assert_eq!(format_duration(Duration::from_micros(2500)), "2.50ms");
/// assert_eq!(format_duration(Duration::from_secs(90)), "1m 30s");
/// ```
pub fn format_duration(duration: Duration) -> String {
    let ns = duration.as_nanos();

    match ns {
        0..=999 => format!("{}ns", ns),
        1_000..=999_999 => format!("{:.2}μs", ns as f64 / 1e3),
        1_000_000..=999_999_999 => format!("{:.2}ms", ns as f64 / 1e6),
        1_000_000_000..=59_999_999_999 => format!("{:.2}s", ns as f64 / 1e9),
        _ => {
            let secs = duration.as_secs();
            let (hours, minutes, seconds) = (secs / 3600, (secs / 60) % 60, secs % 60);
            if hours == 0 {
                format!("{}m {}s", minutes, seconds)
            } else {
                format!("{}h {}m {}s", hours, minutes, seconds)
            }
        }
    }
}
