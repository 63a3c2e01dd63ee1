use std::env;
use std::path::PathBuf;

use tracing::debug;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

/// Console plus rolling-file logging. `STARLOG_LOG` sets the filter
/// (default `info`), `STARLOG_LOG_DIR` the log directory. The returned
/// guard must stay alive for the run so buffered file output is flushed.
pub fn init_logger() -> impl Drop {
    let filter = EnvFilter::new(env::var("STARLOG_LOG").unwrap_or_else(|_| "info".to_string()));

    let log_dir = env::var("STARLOG_LOG_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("./logs"));
    let file_appender = tracing_appender::rolling::daily(&log_dir, "starlog.log");
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    let console_layer = fmt::layer()
        .with_writer(std::io::stdout)
        .with_target(false)
        .without_time()
        .compact();

    let file_layer = fmt::layer()
        .with_writer(file_writer)
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .with(filter)
        .init();

    debug!("Logging to stdout and {}", log_dir.display());

    guard
}
