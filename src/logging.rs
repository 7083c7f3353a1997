use colored::*;
use std::fmt;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::fmt::format::{FormatEvent, FormatFields, Writer};
use tracing_subscriber::fmt::FmtContext;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::EnvFilter;

/// Terse event formatter for interactive runs.
///
/// Info events print as bare messages. Warnings and errors get a colored
/// `warning:`/`error:` tag, and debug/trace output is dimmed. No
/// timestamps or targets are printed.
pub struct LevelTagFormatter;

impl<S, N> FormatEvent<S, N> for LevelTagFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let mut message = String::new();
        ctx.format_fields(Writer::new(&mut message), event)?;

        match *event.metadata().level() {
            Level::ERROR => writeln!(writer, "{} {}", "error:".red().bold(), message),
            Level::WARN => writeln!(writer, "{} {}", "warning:".yellow().bold(), message),
            Level::INFO => writeln!(writer, "{}", message),
            Level::DEBUG | Level::TRACE => writeln!(writer, "{}", message.dimmed()),
        }
    }
}

/// Install the global subscriber.
///
/// Logs go to stderr so the error distribution on stdout can be piped
/// separately. `RUST_LOG` overrides the default level, which is `debug`
/// when verbose and `info` otherwise. Verbose runs use the full tracing
/// format with timestamps and targets.
pub fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if verbose {
        builder.init();
    } else {
        builder.event_format(LevelTagFormatter).init();
    }
}
