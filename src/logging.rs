use anyhow::{anyhow, Context, Result};
use std::fs;
use std::path::Path;
use tracing::Subscriber;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

/// Send all log output to the configured file, appending to it.
///
/// Keep the returned guard alive until exit so buffered lines are flushed.
pub fn init(config: &LoggingConfig) -> Result<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .with_context(|| format!("Invalid log level {:?}", config.level))?;

    let (writer, guard) = file_writer(config)?;

    tracing::subscriber::set_global_default(subscriber(filter, writer))
        .map_err(|e| anyhow!("Failed to install logger: {}", e))?;

    Ok(guard)
}

/// Open the log file for appending, creating its directory if needed
pub fn file_writer(config: &LoggingConfig) -> Result<(NonBlocking, WorkerGuard)> {
    let dir = config
        .file
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let file_name = config
        .file
        .file_name()
        .with_context(|| format!("Log path {:?} has no file name", config.file))?;

    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create log directory {:?}", dir))?;

    let appender = tracing_appender::rolling::never(dir, file_name);
    Ok(tracing_appender::non_blocking(appender))
}

/// Plain-text, timestamped, leveled lines
pub fn subscriber<W>(filter: EnvFilter, writer: W) -> impl Subscriber + Send + Sync + 'static
where
    W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .with_target(false)
        .finish()
}
