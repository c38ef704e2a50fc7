//! Task and project model types.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Lifecycle state of a task.
///
/// Only open tasks are ever held by a store; the closed states exist so that
/// external records can be classified before they are skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    /// Task still needs doing.
    #[default]
    Open,
    /// Task was finished.
    Completed,
    /// Task was deleted.
    Deleted,
}

impl TaskStatus {
    /// Classify a status string reported by the external tracker.
    ///
    /// Anything other than `completed` or `deleted` (pending, waiting,
    /// recurring, ...) counts as open.
    #[must_use]
    pub fn from_external(status: &str) -> Self {
        match status {
            "completed" => Self::Completed,
            "deleted" => Self::Deleted,
            _ => Self::Open,
        }
    }

    /// Check if the status is terminal.
    #[must_use]
    pub const fn is_closed(self) -> bool {
        matches!(self, Self::Completed | Self::Deleted)
    }

    /// Get the string representation of the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Completed => "completed",
            Self::Deleted => "deleted",
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A unit of work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Opaque identifier, assigned by the tracker or generated locally.
    pub id: String,
    /// First line of the task text.
    pub title: String,
    /// Everything after the first line, if any.
    pub description: Option<String>,
    /// Current status.
    pub status: TaskStatus,
    /// Id of the project this task belongs to.
    pub project: Option<String>,
}

impl Task {
    /// Build an open task from free text, splitting off the title line.
    #[must_use]
    pub fn from_text(id: impl Into<String>, text: &str, project: Option<String>) -> Self {
        let (title, description) = split_text(text);
        Self { id: id.into(), title, description, status: TaskStatus::Open, project }
    }
}

/// Split task text into a title and an optional description.
///
/// The text is trimmed, then split on the first newline.
#[must_use]
pub fn split_text(text: &str) -> (String, Option<String>) {
    let text = text.trim();
    match text.split_once('\n') {
        Some((title, description)) => (title.to_string(), Some(description.to_string())),
        None => (text.to_string(), None),
    }
}

/// A named group of tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    /// Unique identifier, also used for the note file and directory names.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Free-form tags, in the order they were given.
    pub tags: Vec<String>,
    /// Ids of the tasks in this project, in source order.
    pub tasks: Vec<String>,
}

impl Project {
    /// Create an empty project. The name defaults to the id.
    #[must_use]
    pub fn new(id: &str, name: Option<&str>, tags: Vec<String>) -> Self {
        Self {
            id: id.to_string(),
            name: name.unwrap_or(id).to_string(),
            tags,
            tasks: Vec::new(),
        }
    }
}

/// Check that a project id can be used as a key and as a file name.
///
/// # Errors
///
/// Returns [`Error::InvalidProjectId`] if the id is empty, contains
/// whitespace or a path separator, or is `.` / `..`.
pub fn validate_project_id(id: &str) -> Result<()> {
    let bad = id.is_empty()
        || id == "."
        || id == ".."
        || id.chars().any(|c| c.is_whitespace() || c == '/' || c == '\\');
    if bad {
        return Err(Error::InvalidProjectId(id.to_string()));
    }
    Ok(())
}
