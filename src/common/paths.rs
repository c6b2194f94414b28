//! Configuration and report file locations

use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

/// Name used for the configuration directory
const APP_NAME: &str = "e2e-harness";

/// Get the configuration directory path
///
/// Uses the directories crate for platform-appropriate locations:
/// - Linux: `~/.config/e2e-harness/`
/// - macOS: `~/Library/Application Support/e2e-harness/`
/// - Windows: `%APPDATA%\e2e-harness\`
pub fn config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", APP_NAME).map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the configuration file
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("config.toml"))
}

/// `<dir>/<session-id>_<YYYYmmdd_HHMMSS>.md`
pub fn report_path(dir: &Path, session_id: &str, completed_at: DateTime<Local>) -> PathBuf {
    dir.join(format!(
        "{}_{}.md",
        session_id,
        completed_at.format("%Y%m%d_%H%M%S")
    ))
}

/// `<stem>_<n>.<ext>` next to `path`, for when `path` is already taken
pub fn numbered(path: &Path, n: u32) -> PathBuf {
    let stem = path.file_stem().unwrap_or_default().to_string_lossy();
    let name = match path.extension() {
        Some(ext) => format!("{}_{}.{}", stem, n, ext.to_string_lossy()),
        None => format!("{}_{}", stem, n),
    };
    path.with_file_name(name)
}

/// `<dir>/debug_<session-id>_<unix-time>.json`
pub fn snapshot_path(dir: &Path, session_id: &str, unix_time: i64) -> PathBuf {
    dir.join(format!("debug_{}_{}.json", session_id, unix_time))
}

/// Ensure the report directory exists
pub fn ensure_dir(dir: &Path) -> io::Result<()> {
    if !dir.exists() {
        std::fs::create_dir_all(dir)?;
    }
    Ok(())
}
