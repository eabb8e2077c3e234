//! File logging. The terminal belongs to the UI, so logs go to
//! `kosmo.log` in the platform data directory.

use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;

use directories::ProjectDirs;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter, e.g. `KOSMO_LOG=debug`.
const LOG_ENV: &str = "KOSMO_LOG";

/// Install the global subscriber. Returns the log file path, or `None` if
/// logging could not be set up; the app runs either way.
pub fn init() -> Option<PathBuf> {
    let dirs = ProjectDirs::from("", "", "kosmo")?;
    let dir = dirs.data_dir();
    fs::create_dir_all(dir).ok()?;

    let path = dir.join("kosmo.log");
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .ok()?;

    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .ok()?;

    Some(path)
}
