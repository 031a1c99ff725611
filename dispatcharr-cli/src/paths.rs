//! Platform directories and log rotation.

use std::fs;
use std::io;
use std::path::Path;
use std::path::PathBuf;

use directories::ProjectDirs;

const QUALIFIER: &str = "org";
const ORGANIZATION: &str = "dispatcharr";
const APPLICATION: &str = "dispatcharr-cli";

/// Name of the log file written by the running process.
const LATEST_LOG: &str = "latest.log";

/// Maximum number of rotated logs kept next to `latest.log`.
const MAX_OLD_LOGS: usize = 25;

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION)
}

/// Persistent data, e.g. `~/.local/share/dispatcharr-cli` on Linux.
pub fn data_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.data_dir().to_path_buf())
}

/// Regenerable data and logs, e.g. `~/.cache/dispatcharr-cli` on Linux.
pub fn cache_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.cache_dir().to_path_buf())
}

pub fn settings_db() -> Option<PathBuf> {
    data_dir().map(|dir| dir.join("settings.db"))
}

pub fn log_file() -> Option<PathBuf> {
    cache_dir().map(|dir| dir.join(LATEST_LOG))
}

/// Create `path`'s parent directory if needed.
pub fn ensure_parent(path: &Path) -> io::Result<()> {
    match path.parent() {
        Some(parent) => fs::create_dir_all(parent),
        None => Ok(()),
    }
}

/// Archive the previous `latest.log` under a timestamp and prune old logs.
///
/// Call before opening the new log file.
pub fn rotate_logs() {
    let Some(cache) = cache_dir() else { return };
    let stamp = chrono::Local::now().format("%Y%m%d_%H%M%S").to_string();
    rotate_in(&cache, &stamp, MAX_OLD_LOGS);
}

fn rotate_in(dir: &Path, stamp: &str, keep: usize) {
    let latest = dir.join(LATEST_LOG);
    if latest.exists() {
        let _ = fs::rename(&latest, dir.join(format!("{stamp}.log")));
    }

    let Ok(entries) = fs::read_dir(dir) else { return };
    let mut archived: Vec<PathBuf> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| {
            p.extension().is_some_and(|ext| ext == "log")
                && p.file_name().is_some_and(|name| name != LATEST_LOG)
        })
        .collect();

    // Timestamped names sort chronologically.
    archived.sort();
    let excess = archived.len().saturating_sub(keep);
    for path in archived.into_iter().take(excess) {
        let _ = fs::remove_file(path);
    }
}
