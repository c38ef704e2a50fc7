//! Taskwarrior integration.
//!
//! Taskwarrior (`task`) is the source of truth for task content and
//! lifecycle when the store runs with an external backend. This module
//! exports its task list, reads its active context and issues add/delete
//! commands, all through a [`CommandRunner`] so it can be mocked.

use crate::error::{Error, Result};
use crate::store::models::{Task, TaskStatus};
use crate::traits::{CommandOutput, CommandRunner, TaskSource};
use serde::{Deserialize, Deserializer};

/// Default program name of the external tracker.
pub const DEFAULT_PROGRAM: &str = "task";

/// Tags that make a task visible in the `work` context.
const WORK_TAGS: [&str; 3] = ["sh", "nvim", "dotfile"];

/// Tag that hides a task from the `private` context.
const WORK_ONLY_TAG: &str = "sh";

/// One record of `task export` output.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RawTask {
    /// Working-set id. Taskwarrior emits a number; strings are accepted too.
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    /// Stable UUID, when present.
    #[serde(default)]
    pub uuid: Option<String>,
    /// Task text: a title line, optionally followed by a longer description.
    pub description: String,
    /// Status string (`pending`, `completed`, `deleted`, `waiting`, ...).
    pub status: String,
    /// Tags attached to the task.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Project the task belongs to.
    #[serde(default)]
    pub project: Option<String>,
}

impl RawTask {
    /// Build a pending record; mostly useful for test fixtures.
    #[must_use]
    pub fn pending(id: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            uuid: None,
            description: description.into(),
            status: "pending".to_string(),
            tags: Vec::new(),
            project: None,
        }
    }

    /// Set the project.
    #[must_use]
    pub fn with_project(mut self, project: impl Into<String>) -> Self {
        self.project = Some(project.into());
        self
    }

    /// Set the tags.
    #[must_use]
    pub fn with_tags(mut self, tags: &[&str]) -> Self {
        self.tags = tags.iter().map(|t| (*t).to_string()).collect();
        self
    }

    /// Set the status string.
    #[must_use]
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = status.into();
        self
    }

    /// Convert into an in-memory task, splitting the title line.
    #[must_use]
    pub fn into_task(self) -> Task {
        let mut task = Task::from_text(self.id, &self.description, self.project);
        task.status = TaskStatus::from_external(&self.status);
        task
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Number(u64),
    Text(String),
}

fn deserialize_id<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match RawId::deserialize(deserializer)? {
        RawId::Number(n) => n.to_string(),
        RawId::Text(s) => s,
    })
}

/// Tag filter selected by the tracker's active context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextFilter {
    /// Only tasks tagged with one of the work tags.
    Work,
    /// Everything except tasks tagged `sh`.
    Private,
}

impl ContextFilter {
    /// Look up the filter for a context name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedContext`] for anything other than `work`
    /// or `private`.
    pub fn from_name(context: &str) -> Result<Self> {
        match context {
            "work" => Ok(Self::Work),
            "private" => Ok(Self::Private),
            other => Err(Error::UnsupportedContext(other.to_string())),
        }
    }

    /// Check whether a task with these tags is visible.
    #[must_use]
    pub fn accepts<S: AsRef<str>>(self, tags: &[S]) -> bool {
        match self {
            Self::Work => tags.iter().any(|t| WORK_TAGS.contains(&t.as_ref())),
            Self::Private => !tags.iter().any(|t| t.as_ref() == WORK_ONLY_TAG),
        }
    }
}

/// Map a context name to its tag predicate.
///
/// # Errors
///
/// Returns [`Error::UnsupportedContext`] for unrecognized contexts.
pub fn context_filter(context: &str) -> Result<ContextFilter> {
    ContextFilter::from_name(context)
}

/// Read the tracker's open tasks that are visible in its active context.
///
/// The export is taken first, then the context is queried. Closed records and
/// records rejected by the context filter are skipped. Each call re-runs the
/// export.
///
/// # Errors
///
/// Returns an error if either query fails or the context is unsupported.
pub fn iter_tasks(source: &dyn TaskSource) -> Result<impl Iterator<Item = Task>> {
    let records = source.export()?;
    let filter = ContextFilter::from_name(&source.context()?)?;

    Ok(records.into_iter().filter_map(move |record| {
        if TaskStatus::from_external(&record.status).is_closed() {
            return None;
        }
        if !filter.accepts(&record.tags) {
            return None;
        }
        Some(record.into_task())
    }))
}

/// [`TaskSource`] backed by the `task` command line program.
#[derive(Debug, Clone)]
pub struct TaskwarriorSource<R> {
    runner: R,
    program: String,
    context: Option<String>,
}

impl<R: CommandRunner> TaskwarriorSource<R> {
    /// Create a source that runs `task` through the given runner.
    pub fn new(runner: R) -> Self {
        Self { runner, program: DEFAULT_PROGRAM.to_string(), context: None }
    }

    /// Use a different program name or path.
    #[must_use]
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    /// Use a fixed context instead of asking the tracker.
    #[must_use]
    pub fn with_context(mut self, context: Option<String>) -> Self {
        self.context = context;
        self
    }

    /// Run the tracker and fail on a non-zero exit status.
    fn run_checked(&self, args: &[&str]) -> Result<CommandOutput> {
        let output = self.runner.run(&self.program, args)?;
        if !output.success() {
            return Err(Error::CommandFailed {
                command: format!("{} {}", self.program, args.join(" ")),
                exit_code: output.exit_code,
                stderr: output.stderr.trim().to_string(),
            });
        }
        Ok(output)
    }
}

impl<R: CommandRunner> TaskSource for TaskwarriorSource<R> {
    fn export(&self) -> Result<Vec<RawTask>> {
        let output = self.run_checked(&["export"])?;
        serde_json::from_str(&output.stdout).map_err(|e| Error::ExportFormat(e.to_string()))
    }

    fn context(&self) -> Result<String> {
        if let Some(context) = &self.context {
            return Ok(context.clone());
        }
        let output = self.run_checked(&["_get", "rc.context"])?;
        Ok(output.stdout.trim().to_string())
    }

    fn delete(&self, id: &str) -> Result<()> {
        self.run_checked(&["rc.confirmation=off", "delete", id])?;
        Ok(())
    }

    fn add(&self, project: Option<&str>, text: &str) -> Result<String> {
        let project_arg = project.map(|p| format!("proj:{p}"));
        let mut args = vec!["add"];
        if let Some(arg) = project_arg.as_deref() {
            args.push(arg);
        }
        args.extend(["due:today", text]);
        let output = self.run_checked(&args)?;
        created_id(&output.stdout).ok_or_else(|| {
            Error::ExportFormat(format!("no task id in add output: {}", output.stdout.trim()))
        })
    }
}

/// Extract the id from Taskwarrior's `Created task 12.` confirmation.
fn created_id(stdout: &str) -> Option<String> {
    stdout.lines().find_map(|line| {
        let id = line.trim().strip_prefix("Created task ")?.trim_end_matches('.');
        (!id.is_empty() && id.chars().all(|c| c.is_ascii_digit())).then(|| id.to_string())
    })
}
