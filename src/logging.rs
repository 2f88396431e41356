use anyhow::Result;
use std::path::PathBuf;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the logging subsystem. Logs go to a daily-rolled file under
/// the platform data directory (stdout belongs to the TUI); the level is
/// controlled by the `PURGIFY_LOG` environment variable, default `info`.
pub fn init() -> Result<()> {
    let log_dir = log_directory();
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, &log_dir, "purgify.log");
    let env_filter = EnvFilter::try_from_env("PURGIFY_LOG")
        .unwrap_or_else(|_| EnvFilter::new("purgify=info,warn"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false)
                .with_target(true),
        )
        .init();

    tracing::debug!("log directory: {}", log_dir.display());
    Ok(())
}

fn log_directory() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("purgify")
        .join("logs")
}
