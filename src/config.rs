//! Configuration management for taskfolio.
//!
//! Settings live in a YAML file (see [`crate::paths::config_path`]). Every
//! key is optional:
//!
//! ```yaml
//! projects_root: ~/notes/projects
//! tasks_root: ./storage
//! task_command: task
//! context: private
//! templates:
//!   blog-post:
//!     - Outline
//!     - Draft
//!     - Proofread
//! ```

use crate::error::Result;
use crate::paths;
use crate::taskwarrior::DEFAULT_PROGRAM;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

fn default_task_command() -> String {
    DEFAULT_PROGRAM.to_string()
}

/// User configuration shared by both tools.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Config {
    /// Store root for the project tool.
    #[serde(default)]
    pub projects_root: Option<PathBuf>,

    /// Store root for the task tool.
    #[serde(default)]
    pub tasks_root: Option<PathBuf>,

    /// Program used to reach the external tracker.
    #[serde(default = "default_task_command")]
    pub task_command: String,

    /// Context to use instead of asking the tracker.
    #[serde(default)]
    pub context: Option<String>,

    /// Named task lists that can be applied to a new project.
    #[serde(default)]
    pub templates: BTreeMap<String, Vec<String>>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            projects_root: None,
            tasks_root: None,
            task_command: default_task_command(),
            context: None,
            templates: BTreeMap::new(),
        }
    }
}

impl Config {
    /// Load config from the default location.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load() -> Result<Self> {
        match paths::config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load config from a specific file. A missing or empty file yields the
    /// defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(&content)?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Root of the project tool's store, with `~` expanded.
    #[must_use]
    pub fn projects_root(&self) -> Option<PathBuf> {
        self.projects_root
            .as_deref()
            .map(paths::expand_home)
            .or_else(paths::default_projects_root)
    }

    /// Root of the task tool's store, with `~` expanded and relative paths
    /// resolved against `cwd`.
    #[must_use]
    pub fn tasks_root(&self, cwd: &Path) -> PathBuf {
        self.tasks_root
            .as_deref()
            .map_or_else(|| paths::default_tasks_root(cwd), |p| cwd.join(paths::expand_home(p)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_is_default() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_from(&dir.path().join("config.yaml")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.task_command, "task");
    }

    #[test]
    fn test_empty_file_is_default() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "\n").unwrap();
        assert_eq!(Config::load_from(&path).unwrap(), Config::default());
    }

    #[test]
    fn test_parse_full_config() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(
            &path,
            "projects_root: /data/projects\ntask_command: /usr/local/bin/task\ncontext: work\n\
             templates:\n  blog-post:\n    - Outline\n    - Draft\n",
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.projects_root(), Some(PathBuf::from("/data/projects")));
        assert_eq!(config.task_command, "/usr/local/bin/task");
        assert_eq!(config.context.as_deref(), Some("work"));
        assert_eq!(config.templates["blog-post"], vec!["Outline", "Draft"]);
    }

    #[test]
    fn test_malformed_config_is_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "templates: [unclosed").unwrap();
        assert!(matches!(Config::load_from(&path), Err(crate::error::Error::Yaml(_))));
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "context: private\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.context.as_deref(), Some("private"));
        assert_eq!(config.task_command, "task");
        assert!(config.templates.is_empty());
        assert_eq!(config.tasks_root, None);
    }

    #[test]
    fn test_tasks_root_resolution() {
        let cwd = Path::new("/work");
        assert_eq!(Config::default().tasks_root(cwd), PathBuf::from("/work/storage"));

        let relative = Config { tasks_root: Some(PathBuf::from("data")), ..Default::default() };
        assert_eq!(relative.tasks_root(cwd), PathBuf::from("/work/data"));

        let absolute = Config { tasks_root: Some(PathBuf::from("/srv/tasks")), ..Default::default() };
        assert_eq!(absolute.tasks_root(cwd), PathBuf::from("/srv/tasks"));
    }
}
