//! Logging system initialization
//!
//! Sets up `tracing` from the `[logging]` section: console or file output,
//! optional daily rotation, text or JSON formatting.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;

use crate::config::LoggingConfig;
use crate::errors::{Result, ShortenerError};

/// Initialize logging system based on configuration
///
/// **Note**: call once, after the configuration has been loaded.
///
/// The returned `WorkerGuard` must be kept alive for the duration of the
/// program so buffered log lines are flushed on exit.
pub fn init_logging(config: &LoggingConfig) -> Result<WorkerGuard> {
    let log_file = config.file.as_deref().filter(|f| !f.is_empty());

    let writer: Box<dyn std::io::Write + Send + Sync> = match log_file {
        Some(log_file) if config.enable_rotation => {
            let path = Path::new(log_file);
            let dir = path
                .parent()
                .filter(|d| !d.as_os_str().is_empty())
                .unwrap_or(Path::new("."));
            let filename = path
                .file_name()
                .and_then(|f| f.to_str())
                .unwrap_or("shortener.log");
            let appender = rolling::Builder::new()
                .rotation(rolling::Rotation::DAILY)
                .filename_prefix(filename.trim_end_matches(".log"))
                .filename_suffix("log")
                .max_log_files(config.max_backups.max(1) as usize)
                .build(dir)
                .map_err(|e| {
                    ShortenerError::config(format!("Failed to create rolling log appender: {}", e))
                })?;
            Box::new(appender)
        }
        Some(log_file) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(log_file)
                .map_err(|e| {
                    ShortenerError::config(format!("Failed to open log file '{}': {}", log_file, e))
                })?;
            Box::new(file)
        }
        None => Box::new(std::io::stdout()),
    };

    let (non_blocking_writer, guard) = tracing_appender::non_blocking(writer);
    let filter = tracing_subscriber::EnvFilter::try_new(&config.level).map_err(|e| {
        ShortenerError::config(format!("Invalid log level '{}': {}", config.level, e))
    })?;

    let subscriber_builder = tracing_subscriber::fmt()
        .with_writer(non_blocking_writer)
        .with_env_filter(filter)
        .with_level(true)
        .with_ansi(log_file.is_none());

    let installed = if config.format == "json" {
        subscriber_builder.json().try_init()
    } else {
        subscriber_builder.try_init()
    };
    installed.map_err(|e| ShortenerError::config(format!("Failed to install logger: {}", e)))?;

    Ok(guard)
}
