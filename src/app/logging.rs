use std::path::Path;

use anyhow::{anyhow, Result};
use tracing::debug;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

/// Log to `gallery.log` under `log_dir`. Stdout stays reserved for command
/// output. Keep the returned guard alive until exit or buffered lines are
/// lost.
pub fn init_logger(log_dir: &Path, level: &str) -> Result<WorkerGuard> {
    let level = level.parse::<LevelFilter>().unwrap_or(LevelFilter::INFO);

    let file_appender = tracing_appender::rolling::never(log_dir, "gallery.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .with(level)
        .try_init()
        .map_err(|e| anyhow!("{}", e))?;

    debug!("logging to {}", log_dir.display());
    Ok(guard)
}
