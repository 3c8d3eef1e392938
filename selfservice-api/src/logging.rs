///! Logging setup
///! Console output plus an optional daily-rotated JSON log file

use tracing_appender::{non_blocking, non_blocking::WorkerGuard, rolling};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};
use std::io;

use crate::config::LoggingConfig;

const LOG_FILE_NAME: &str = "selfservice.log";

/// Initialize logging based on configuration.
///
/// The returned guard flushes the file writer and must be held until the
/// process exits.
pub fn init(config: &LoggingConfig) -> Result<Option<WorkerGuard>, Box<dyn std::error::Error>> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))?;

    let console_layer = if config.json {
        fmt::layer()
            .with_target(true)
            .json()
            .with_writer(io::stdout)
            .boxed()
    } else {
        fmt::layer()
            .with_target(true)
            .with_level(true)
            .with_ansi(true)
            .with_writer(io::stdout)
            .boxed()
    };

    let (file_layer, guard) = if config.file_logging_enabled {
        let file_appender = rolling::daily(&config.log_dir, LOG_FILE_NAME);
        let (writer, guard) = non_blocking(file_appender);

        let layer = fmt::layer()
            .with_target(true)
            .with_level(true)
            .with_thread_ids(true)
            .with_ansi(false)
            .json()
            .with_writer(writer);

        (Some(layer), Some(guard))
    } else {
        (None, None)
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()?;

    tracing::info!("Logging initialized - level: {}", config.level);

    Ok(guard)
}
