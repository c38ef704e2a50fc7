//! Path utilities for determining where data and configuration live.
//!
//! The project tool keeps its notes in `~/notes/projects/`; the task tool
//! works on a `storage/` directory under the current directory. Both read
//! `~/.config/taskfolio/config.yaml` (or the platform equivalent) unless
//! `TASKFOLIO_CONFIG` points elsewhere.

use std::path::{Path, PathBuf};

/// Directory name for taskfolio inside the platform config directory.
const APP_DIR_NAME: &str = "taskfolio";

/// The configuration filename.
pub const CONFIG_FILENAME: &str = "config.yaml";

/// Environment variable overriding the configuration file path.
pub const CONFIG_ENV: &str = "TASKFOLIO_CONFIG";

/// Store directory used by the task tool, relative to the working directory.
pub const TASKS_STORAGE_NAME: &str = "storage";

/// Get the configuration file path.
///
/// Returns `$TASKFOLIO_CONFIG` if set and non-empty, otherwise
/// `<config_dir>/taskfolio/config.yaml`, or `None` if the platform config
/// directory cannot be determined.
#[must_use]
pub fn config_path() -> Option<PathBuf> {
    match std::env::var_os(CONFIG_ENV) {
        Some(path) if !path.is_empty() => Some(PathBuf::from(path)),
        _ => dirs::config_dir().map(|dir| dir.join(APP_DIR_NAME).join(CONFIG_FILENAME)),
    }
}

/// Default root of the project tool's store: `~/notes/projects`.
#[must_use]
pub fn default_projects_root() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join("notes").join("projects"))
}

/// Default root of the task tool's store: `<cwd>/storage`.
#[must_use]
pub fn default_tasks_root(cwd: &Path) -> PathBuf {
    cwd.join(TASKS_STORAGE_NAME)
}

/// Expand a leading `~` to the home directory.
///
/// Paths without a leading `~`, or when the home directory is unknown, are
/// returned unchanged.
#[must_use]
pub fn expand_home(path: &Path) -> PathBuf {
    let Ok(rest) = path.strip_prefix("~") else {
        return path.to_path_buf();
    };
    dirs::home_dir().map_or_else(|| path.to_path_buf(), |home| home.join(rest))
}
