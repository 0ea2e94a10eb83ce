// tracing setup: stderr console layer plus an optional append-only log file.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::fmt::format::{self, FormatEvent, FormatFields};
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::fmt::{self as tfmt, FmtContext};
use tracing_subscriber::prelude::*;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{EnvFilter, filter::LevelFilter};

/// Alerts already print as `[ALERT]` on stdout, so the console layer hides their log events.
pub const DEFAULT_CONSOLE_FILTER: &str = "warn,alerts=off";

/// Target for per-alert log events.
pub const ALERT_TARGET: &str = "alerts";

struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut format::Writer<'_>) -> std::fmt::Result {
        write!(
            w,
            "{}",
            chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z")
        )
    }
}

/// `<ISO timestamp> - <LEVEL> - <message>` lines for the log file.
struct LogFileFormat;

impl<S, N> FormatEvent<S, N> for LogFileFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: format::Writer<'_>,
        event: &Event<'_>,
    ) -> std::fmt::Result {
        write!(
            writer,
            "{} - {} - ",
            chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f"),
            level_name(event.metadata().level())
        )?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

fn level_name(level: &Level) -> &'static str {
    match *level {
        Level::ERROR => "ERROR",
        Level::WARN => "WARNING",
        Level::INFO => "INFO",
        Level::DEBUG => "DEBUG",
        Level::TRACE => "TRACE",
    }
}

/// Install the global subscriber. `RUST_LOG` overrides the console filter; the log file,
/// when given, records INFO and above. Fails without installing anything if the log file
/// cannot be opened.
pub fn init(log_file: Option<&Path>) -> anyhow::Result<()> {
    let file_layer = match log_file {
        Some(path) => {
            crate::persistence::ensure_parent_dir(path)?;
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            Some(
                tfmt::layer()
                    .event_format(LogFileFormat)
                    .with_ansi(false)
                    .with_writer(Mutex::new(file))
                    .with_filter(LevelFilter::INFO),
            )
        }
        None => None,
    };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_CONSOLE_FILTER));
    let console_layer = tfmt::layer()
        .with_writer(std::io::stderr)
        .with_timer(LocalTimer)
        .with_filter(filter);

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .try_init()?;
    Ok(())
}
