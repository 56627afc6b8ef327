//! Diagnostic logging setup.
//!
//! Installs a `tracing` subscriber with a stderr console layer and, when a
//! directory is given, a daily-rolling plain-text file layer.

use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// File name prefix for rolling log files (`pagepilot.log.YYYY-MM-DD`).
pub const LOG_FILE_PREFIX: &str = "pagepilot.log";

/// Filter for a verbosity count (`-v` flags).
///
/// At verbosity 0 `RUST_LOG` is honoured when set.
pub fn filter_for(verbosity: u8) -> EnvFilter {
    match verbosity {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    }
}

/// Install the global subscriber.
///
/// Returns the file writer's guard when `log_dir` is set; keep it alive for
/// the life of the process or buffered lines are lost. Calling this twice is
/// harmless: the second subscriber is not installed.
pub fn init_tracing(verbosity: u8, log_dir: Option<&Path>) -> Option<WorkerGuard> {
    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().with_writer(writer).with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    let _ = tracing_subscriber::registry()
        .with(filter_for(verbosity))
        .with(console_layer)
        .with(file_layer)
        .try_init();

    guard
}
