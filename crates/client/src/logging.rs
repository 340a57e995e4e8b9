//! Logging setup: human-readable stderr plus a per-run log file.

use std::path::{Path, PathBuf};

use anyhow::Result;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Platform log directory, falling back to `./logs`.
pub fn log_directory() -> PathBuf {
    directories::ProjectDirs::from("", "", "combat-sim")
        .map(|dirs| dirs.data_local_dir().join("logs"))
        .unwrap_or_else(|| PathBuf::from("logs"))
}

pub fn setup_logging(log_dir: &Path) -> Result<()> {
    std::fs::create_dir_all(log_dir)?;

    let file_appender = tracing_appender::rolling::never(log_dir, "combat-sim.log");
    let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing::Level::INFO.into());

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false);

    // Events go to stdout as JSON; logs stay on stderr.
    let stderr_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(stderr_layer)
        .init();

    // Leak the guard to keep file writer alive
    std::mem::forget(guard);

    tracing::info!("Logging to {}", log_dir.join("combat-sim.log").display());
    Ok(())
}
