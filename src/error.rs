//! Error types for `taskfolio`.

use std::path::PathBuf;

/// Errors that can occur while managing projects and tasks.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A JSON encoding or decoding error occurred.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The configuration file could not be parsed.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A project with this id already exists.
    #[error("Project '{0}' already exists")]
    DuplicateProject(String),

    /// No project with this id exists.
    #[error("Project '{0}' does not exist")]
    UnknownProject(String),

    /// The project id cannot be used (empty, whitespace or path separators).
    #[error("Invalid project id '{0}': must be non-empty without whitespace or path separators")]
    InvalidProjectId(String),

    /// The external tool reported a context with no tag filter.
    #[error("Unsupported context '{0}'")]
    UnsupportedContext(String),

    /// The external tool exited with a non-zero status.
    #[error("Command '{command}' failed with exit code {exit_code}: {stderr}")]
    CommandFailed {
        /// The command that was run.
        command: String,
        /// The exit code.
        exit_code: i32,
        /// The stderr output.
        stderr: String,
    },

    /// The external tool's output could not be understood.
    #[error("Unexpected tracker output: {0}")]
    ExportFormat(String),

    /// The snapshot file exists but is not a valid store.
    #[error("Corrupt store at {}: {reason}", path.display())]
    CorruptStore {
        /// Path to the snapshot file.
        path: PathBuf,
        /// What was wrong with it.
        reason: String,
    },

    /// A new task got an identifier that is already taken.
    #[error("Task id '{0}' is already in use")]
    IdCollision(String),

    /// A template was requested that is not configured.
    #[error("Template '{0}' is not configured")]
    UnknownTemplate(String),
}

/// A specialized Result type for this crate.
pub type Result<T> = std::result::Result<T, Error>;
