use std::env;

use tracing_appender::{
    non_blocking::WorkerGuard,
    rolling::{Builder, Rotation},
};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::{
    Result, TunelineError,
    config::{ConfigPaths, LogLevel},
};

const DAYS_TO_KEEP: usize = 7;

/// Initialize tracing with file output
///
/// The terminal belongs to the display, so logs only go to a daily-rolling
/// file in the tuneline logs directory. `RUST_LOG` overrides `level`.
/// `TUNELINE_LOG_FORMAT=json` writes JSON lines instead of compact text.
///
/// The returned guard flushes buffered lines when dropped; keep it alive
/// for the life of the process.
///
/// # Errors
/// Returns error if the log directory or file cannot be created, or a global
/// subscriber is already installed
pub fn init_with_file(level: LogLevel) -> Result<WorkerGuard> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.to_string()));

    let log_dir = ConfigPaths::log_dir()?;

    let file_appender = Builder::new()
        .rotation(Rotation::DAILY)
        .max_log_files(DAYS_TO_KEEP)
        .filename_prefix("tuneline")
        .filename_suffix("log")
        .build(&log_dir)
        .map_err(|e| TunelineError::Logging(e.to_string()))?;
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let format = env::var("TUNELINE_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(env_filter);

    let installed = match format.as_str() {
        "json" => registry
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_level(true)
                    .with_writer(non_blocking)
                    .with_ansi(false),
            )
            .try_init(),
        _ => registry
            .with(
                fmt::layer()
                    .compact()
                    .with_target(true)
                    .with_level(true)
                    .with_writer(non_blocking)
                    .with_ansi(false),
            )
            .try_init(),
    };
    installed.map_err(|e| TunelineError::Logging(e.to_string()))?;

    Ok(guard)
}
