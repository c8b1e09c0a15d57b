//! Log output for the terminal binary
//!
//! The terminal belongs to the UI, so logs go to `recipebox.log` in the cache
//! directory. The filter comes from `RECIPEBOX_LOG` (default `info`).

use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter
pub const LOG_ENV: &str = "RECIPEBOX_LOG";

/// Name of the log file inside the cache directory
pub const LOG_FILE: &str = "recipebox.log";

/// Installs a file-backed subscriber and returns the log file path
pub fn init(dir: &Path) -> io::Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(LOG_FILE);
    let file = OpenOptions::new().create(true).append(true).open(&path)?;

    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));

    // A second init (e.g. in tests) keeps the first subscriber
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init();

    Ok(path)
}
