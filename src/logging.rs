use color_eyre::{eyre::eyre, Result};
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Route tracing output to a daily log file; the terminal belongs to the UI.
///
/// Keep the returned guard alive until exit or buffered lines are lost.
pub fn init() -> Result<WorkerGuard> {
  let log_dir = log_dir()?;
  std::fs::create_dir_all(&log_dir)
    .map_err(|e| eyre!("Failed to create log directory {}: {}", log_dir.display(), e))?;

  let (writer, guard) = tracing_appender::non_blocking(rolling::daily(&log_dir, "bazar.log"));

  let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
    if cfg!(debug_assertions) {
      EnvFilter::new("info,bazar=debug")
    } else {
      EnvFilter::new("warn")
    }
  });

  tracing_subscriber::registry()
    .with(env_filter)
    .with(
      fmt::layer()
        .with_ansi(false)
        .with_target(true)
        .with_writer(writer),
    )
    .try_init()
    .map_err(|e| eyre!("Failed to initialize logging: {}", e))?;

  tracing::info!(path = %log_dir.display(), "logging initialized");
  Ok(guard)
}

fn log_dir() -> Result<PathBuf> {
  let data_dir = dirs::data_dir()
    .or_else(|| dirs::home_dir().map(|p| p.join(".local/share")))
    .ok_or_else(|| eyre!("Could not determine data directory"))?;

  Ok(data_dir.join("bazar").join("logs"))
}
