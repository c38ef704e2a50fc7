//! Command execution for the CLI.
//!
//! The `run_*` entry points resolve configuration and build the real store;
//! the `execute_*` functions take the backend as a parameter so tests can
//! drive them with an in-memory task source.

use crate::cli::{ProjectsCli, ProjectsCommand, TaskProjectsCommand, TasksCli, TasksCommand};
use crate::command::RealCommandRunner;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::store::{Backend, Project, Store};
use crate::taskwarrior::TaskwarriorSource;
use crate::templates;
use clap::CommandFactory;
use std::path::Path;
use std::process::ExitCode;

/// Output from running the CLI, with separate stdout and stderr messages.
#[derive(Debug)]
pub struct CliOutput {
    /// Exit code for the process.
    pub exit_code: ExitCode,
    /// Messages to print to stdout.
    pub stdout: Vec<String>,
    /// Messages to print to stderr.
    pub stderr: Vec<String>,
}

fn success_output(stdout: Vec<String>) -> CliOutput {
    CliOutput { exit_code: ExitCode::SUCCESS, stdout, stderr: vec![] }
}

fn error_output(message: impl Into<String>) -> CliOutput {
    CliOutput { exit_code: ExitCode::from(1), stdout: vec![], stderr: vec![message.into()] }
}

fn usage_output(mut command: clap::Command) -> CliOutput {
    CliOutput {
        exit_code: ExitCode::from(1),
        stdout: vec![command.render_help().to_string()],
        stderr: vec![],
    }
}

fn into_output(result: Result<Vec<String>>) -> CliOutput {
    match result {
        Ok(lines) => success_output(lines),
        Err(e) => error_output(format!("Error: {e}")),
    }
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    path.map_or_else(Config::load, Config::load_from)
}

/// Run the `projects` tool against Taskwarrior.
pub fn run_projects(cli: ProjectsCli) -> CliOutput {
    let Some(command) = cli.command else {
        return usage_output(ProjectsCli::command());
    };
    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => return error_output(format!("Error loading config: {e}")),
    };
    let Some(root) = cli.root.or_else(|| config.projects_root()) else {
        return error_output("Error: cannot determine the home directory; pass --root");
    };

    let source = TaskwarriorSource::new(RealCommandRunner::new())
        .with_program(config.task_command.clone())
        .with_context(config.context.clone());
    execute_projects(command, &config, &root, Backend::external(source))
}

/// Run the `tasks` tool against its own snapshot.
pub fn run_tasks(cli: TasksCli) -> CliOutput {
    let Some(command) = cli.command else {
        return usage_output(TasksCli::command());
    };
    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => return error_output(format!("Error loading config: {e}")),
    };
    let root = match cli.root {
        Some(root) => root,
        None => match std::env::current_dir() {
            Ok(cwd) => config.tasks_root(&cwd),
            Err(e) => return error_output(format!("Error: {e}")),
        },
    };

    execute_tasks(command, &root, Backend::Local)
}

// === projects ===

/// Execute a `projects` command on the store at `root`.
pub fn execute_projects(
    command: ProjectsCommand,
    config: &Config,
    root: &Path,
    backend: Backend,
) -> CliOutput {
    into_output(projects_command(command, config, root, backend))
}

fn projects_command(
    command: ProjectsCommand,
    config: &Config,
    root: &Path,
    backend: Backend,
) -> Result<Vec<String>> {
    match command {
        ProjectsCommand::Add { id, name, tags, template } => {
            if let Some(template) = &template {
                templates::lookup(config, template)?;
            }
            let mut store = Store::load(root, backend)?;
            let tags = tags.into_iter().map(|t| t.trim().to_string()).filter(|t| !t.is_empty());
            store.add_project(&id, name.as_deref(), tags.collect())?;
            store.save()?;

            let mut lines = vec![format!("Created project '{id}'")];
            if let Some(template) = &template {
                let created = templates::apply(&mut store, config, &id, template)?;
                store.save()?;
                lines.push(format!("Added {} task(s) from template '{template}'", created.len()));
            }
            Ok(lines)
        }
        ProjectsCommand::Show { id: None } => {
            let store = Store::load(root, backend)?;
            Ok(store.projects().iter().map(project_header).collect())
        }
        ProjectsCommand::Show { id: Some(id) } => {
            let store = Store::load(root, backend)?;
            let project = store.project(&id).ok_or_else(|| Error::UnknownProject(id.clone()))?;
            let mut lines = vec![project_header(project)];
            lines.extend(
                store
                    .project_tasks(&id)?
                    .into_iter()
                    .map(|task| format!("  {} | {}", task.id, task.title)),
            );
            Ok(lines)
        }
        ProjectsCommand::Delete { id } => {
            let mut store = Store::load(root, backend)?;
            store.delete_project(&id)?;
            Ok(vec![format!("Deleted project '{id}'")])
        }
    }
}

/// One-line summary of a project: `<name> (<id>) +tag: N task(s)`.
#[must_use]
pub fn project_header(project: &Project) -> String {
    let tags: String = project.tags.iter().map(|tag| format!(" +{tag}")).collect();
    format!("{} ({}){tags}: {} task(s)", project.name, project.id, project.tasks.len())
}

// === tasks ===

/// Execute a `tasks` command on the store at `root`.
pub fn execute_tasks(command: TasksCommand, root: &Path, backend: Backend) -> CliOutput {
    into_output(tasks_command(command, root, backend))
}

fn tasks_command(command: TasksCommand, root: &Path, backend: Backend) -> Result<Vec<String>> {
    let mut store = Store::load(root, backend)?;
    match command {
        TasksCommand::Add { name, project } => {
            let mut lines = vec![];
            if let Some(project) = project.as_deref() {
                if store.project(project).is_none() {
                    store.add_project(project, None, vec![])?;
                    lines.push(format!("Created new project '{project}'"));
                }
            }
            let id = store.add_task(&name, project.as_deref())?.id.clone();
            store.save()?;
            lines.push(format!("Added task {id}"));
            Ok(lines)
        }
        TasksCommand::Show => Ok(store
            .tasks()
            .iter()
            .enumerate()
            .map(|(index, task)| {
                format!("{index} | {} | {}", task.title, task.project.as_deref().unwrap_or("-"))
            })
            .collect()),
        TasksCommand::Projects(TaskProjectsCommand::Show) => Ok(store
            .projects()
            .iter()
            .map(|project| format!("Proj '{}' ({} task(s))", project.id, project.tasks.len()))
            .collect()),
        TasksCommand::Projects(TaskProjectsCommand::Delete { project }) => {
            store.delete_project(&project)?;
            Ok(vec![format!("Deleted project '{project}'")])
        }
    }
}
