//! Logging init: file under the XDG state dir, or graceful fallback to stderr.

use anyhow::Result;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,listget=debug"))
}

/// Initialize structured logging to `~/.local/state/listget/listget.log`.
/// Returns Err when the state dir is unwritable so the caller can fall back
/// to [`init_logging_stderr`].
pub fn init_logging() -> Result<()> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("listget")?;
    let log_dir = xdg_dirs.get_state_home().join("listget");

    fs::create_dir_all(&log_dir)?;
    let log_file_path: PathBuf = log_dir.join("listget.log");

    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_file_path)?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();

    tracing::info!("listget logging initialized at {}", log_file_path.display());
    Ok(())
}

/// Initialize logging to stderr only. Used when `init_logging` fails so the
/// CLI still runs.
pub fn init_logging_stderr() {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}
