//! Tracing initialization.
//!
//! - `DEVTYPE_LOG` controls the filter (e.g. "debug" or "info,devtype::session=debug").
//! - `DEVTYPE_LOG_FORMAT=json` switches to JSON lines.
//!
//! The terminal UI owns stdout, so events always go to a log file.

use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result, anyhow};
use tracing_subscriber::EnvFilter;

pub const LOG_FILE: &str = "devtype.log";

/// Install the global subscriber, appending to `<log_dir>/devtype.log`.
/// Returns the log file path.
pub fn init_tracing(log_dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(log_dir)
        .with_context(|| format!("creating log directory {}", log_dir.display()))?;
    let path = log_dir.join(LOG_FILE);
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("opening log file {}", path.display()))?;

    let filter = EnvFilter::try_from_env("DEVTYPE_LOG").unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_ansi(false)
        .with_writer(Mutex::new(file));

    match std::env::var("DEVTYPE_LOG_FORMAT").as_deref() {
        Ok("json") => builder.json().try_init(),
        _ => builder.try_init(),
    }
    .map_err(|e| anyhow!("installing log subscriber: {e}"))?;

    Ok(path)
}
