//! Command line interfaces for the two tools.
//!
//! `projects` manages project notes on top of Taskwarrior. `tasks` is the
//! self-contained variant that keeps its tasks in the snapshot.

mod run;


pub use run::{
    execute_projects, execute_tasks, project_header, run_projects, run_tasks, CliOutput,
};

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Manage project notes linked to Taskwarrior tasks.
///
/// Each project owns a markdown note and a directory under the store root,
/// and collects the pending tasks that carry its name as `project:`.
#[derive(Parser, Debug)]
#[command(name = "projects")]
#[command(version, about, long_about = None)]
pub struct ProjectsCli {
    /// Store root (defaults to `~/notes/projects`)
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,

    /// Configuration file to read instead of the default one
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// The command to execute
    #[command(subcommand)]
    pub command: Option<ProjectsCommand>,
}

/// Commands of the `projects` tool.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum ProjectsCommand {
    /// Create a project with its note and directory.
    Add {
        /// Project identifier, also used for file names
        id: String,

        /// Human readable name (defaults to the id)
        name: Option<String>,

        /// Comma separated tags
        #[arg(short, long, value_delimiter = ',')]
        tags: Vec<String>,

        /// Template from the configuration to seed tasks from
        #[arg(long)]
        template: Option<String>,
    },

    /// List projects, or the tasks of one project.
    Show {
        /// Project to show in detail
        id: Option<String>,
    },

    /// Delete a project, its tasks and its files.
    Delete {
        /// Project to delete
        id: String,
    },
}

/// Keep a small list of tasks grouped into projects.
#[derive(Parser, Debug)]
#[command(name = "tasks")]
#[command(version, about, long_about = None)]
pub struct TasksCli {
    /// Store root (defaults to `./storage`)
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,

    /// Configuration file to read instead of the default one
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// The command to execute
    #[command(subcommand)]
    pub command: Option<TasksCommand>,
}

/// Commands of the `tasks` tool.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum TasksCommand {
    /// Add a task, creating its project if needed.
    Add {
        /// Task text; the first line is the title
        name: String,

        /// Project to file the task under
        #[arg(short, long)]
        project: Option<String>,
    },

    /// List all tasks.
    Show,

    /// Project operations.
    #[command(subcommand)]
    Projects(TaskProjectsCommand),
}

/// `tasks projects ...` commands.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum TaskProjectsCommand {
    /// List projects with their task counts.
    Show,

    /// Delete a project and its tasks.
    Delete {
        /// Project to delete
        project: String,
    },
}
