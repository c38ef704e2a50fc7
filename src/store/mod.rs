//! Project and task store.
//!
//! A [`Store`] is rooted at a directory holding the JSON snapshot plus one
//! note file (`<id>.md`) and one directory (`<id>/`) per project. Tasks come
//! from one of two backends:
//!
//! - [`Backend::Local`]: the store owns its tasks and persists them in the
//!   snapshot.
//! - [`Backend::External`]: an external tracker owns the tasks. The snapshot
//!   only keeps project metadata and tasks are re-read on every load.
//!
//! # Example
//!
//! ```no_run
//! use taskfolio::store::{Backend, Store};
//!
//! let mut store = Store::load("/tmp/notes", Backend::Local).unwrap();
//! store.add_project("blog", Some("My Blog"), vec!["writing".to_string()]).unwrap();
//! store.add_task("Draft first post", Some("blog")).unwrap();
//! store.save().unwrap();
//! ```

pub mod id;
pub mod models;
pub mod snapshot;

pub use id::{RandomIds, SequentialIds};
pub use models::{validate_project_id, Project, Task, TaskStatus};

use crate::error::{Error, Result};
use crate::taskwarrior::iter_tasks;
use crate::traits::{IdGenerator, TaskSource};
use snapshot::{ProjectRecord, Snapshot, TaskRecord, SNAPSHOT_FILE};
use std::fs::{self, OpenOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// How many fresh ids to try before giving up on a collision.
const MAX_ID_ATTEMPTS: usize = 8;

/// Where task records come from.
pub enum Backend {
    /// Tasks are owned by the store and saved in the snapshot.
    Local,
    /// Tasks are owned by an external tracker.
    External(Box<dyn TaskSource>),
}

impl Backend {
    /// Wrap a task source as an external backend.
    pub fn external(source: impl TaskSource + 'static) -> Self {
        Self::External(Box::new(source))
    }

    /// Check if the store owns its tasks.
    #[must_use]
    pub const fn is_local(&self) -> bool {
        matches!(self, Self::Local)
    }
}

impl std::fmt::Debug for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Local => f.write_str("Local"),
            Self::External(_) => f.write_str("External"),
        }
    }
}

/// The project/task aggregate.
pub struct Store {
    root: PathBuf,
    tasks: Vec<Task>,
    projects: Vec<Project>,
    backend: Backend,
    ids: Box<dyn IdGenerator>,
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("root", &self.root)
            .field("backend", &self.backend)
            .field("projects", &self.projects.len())
            .field("tasks", &self.tasks.len())
            .finish_non_exhaustive()
    }
}

impl Store {
    /// Open the store rooted at `root`, generating random task ids.
    ///
    /// # Errors
    ///
    /// See [`Store::load_with_ids`].
    pub fn load(root: impl Into<PathBuf>, backend: Backend) -> Result<Self> {
        Self::load_with_ids(root, backend, Box::new(RandomIds))
    }

    /// Open the store rooted at `root` with a specific id generator.
    ///
    /// Without a snapshot file the store starts empty and the backend is not
    /// consulted. Otherwise projects are read from the snapshot and tasks are
    /// attached to them; tasks naming a project that does not exist are
    /// logged and dropped.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CorruptStore`] for an unreadable snapshot, or any
    /// error the external backend reports while exporting.
    pub fn load_with_ids(
        root: impl Into<PathBuf>,
        backend: Backend,
        ids: Box<dyn IdGenerator>,
    ) -> Result<Self> {
        let mut store =
            Self { root: root.into(), tasks: Vec::new(), projects: Vec::new(), backend, ids };

        let Some(snapshot) = snapshot::read(&store.snapshot_path())? else {
            tracing::debug!(root = %store.root.display(), "no snapshot, starting empty");
            return Ok(store);
        };

        let Snapshot { projects, tasks } = snapshot;
        let mut listed = Vec::with_capacity(projects.len());
        for record in projects {
            listed.push(record.tasks.unwrap_or_default());
            store.projects.push(Project {
                id: record.id,
                name: record.name,
                tags: record.tags,
                tasks: Vec::new(),
            });
        }

        let external = match &store.backend {
            Backend::Local => None,
            Backend::External(source) => Some(iter_tasks(&**source)?.collect::<Vec<_>>()),
        };
        match external {
            Some(tasks) => store.attach_external(tasks),
            None => store.attach_local(tasks.unwrap_or_default(), listed),
        }

        Ok(store)
    }

    fn attach_external(&mut self, tasks: Vec<Task>) {
        for task in tasks {
            if self.task(&task.id).is_some() {
                tracing::warn!(task = %task.id, "duplicate task id in export, ignored");
                continue;
            }
            let Some(project_id) = task.project.clone() else {
                self.tasks.push(task);
                continue;
            };
            let Some(index) = self.project_index(&project_id) else {
                tracing::warn!(
                    task = %task.id,
                    project = %project_id,
                    "project does not exist, task ignored"
                );
                continue;
            };
            self.projects[index].tasks.push(task.id.clone());
            self.tasks.push(task);
        }
    }

    fn attach_local(&mut self, records: Vec<(String, TaskRecord)>, listed: Vec<Vec<String>>) {
        for (id, record) in records {
            if let Some(project_id) = &record.project_id {
                if self.project_index(project_id).is_none() {
                    tracing::warn!(
                        task = %id,
                        project = %project_id,
                        "project does not exist, task ignored"
                    );
                    continue;
                }
            }
            self.tasks.push(Task {
                id,
                title: record.title,
                description: record.description,
                status: TaskStatus::Open,
                project: record.project_id,
            });
        }

        for (project, ids) in self.projects.iter_mut().zip(listed) {
            for id in ids {
                let owned = self
                    .tasks
                    .iter()
                    .any(|t| t.id == id && t.project.as_deref() == Some(project.id.as_str()));
                if owned && !project.tasks.contains(&id) {
                    project.tasks.push(id);
                } else {
                    tracing::warn!(task = %id, project = %project.id, "stale task reference dropped");
                }
            }
        }

        for task in &self.tasks {
            let Some(project_id) = task.project.as_deref() else { continue };
            if let Some(project) = self.projects.iter_mut().find(|p| p.id == project_id) {
                if !project.tasks.contains(&task.id) {
                    project.tasks.push(task.id.clone());
                }
            }
        }
    }

    /// Write the snapshot to `<root>/data.json`.
    ///
    /// External stores only write project id, name and tags. Local stores
    /// additionally write each project's task list and the task records.
    ///
    /// # Errors
    ///
    /// Returns an error if the root cannot be created or the file written.
    pub fn save(&self) -> Result<()> {
        fs::create_dir_all(&self.root)?;
        snapshot::write(&self.snapshot_path(), &self.to_snapshot())
    }

    fn to_snapshot(&self) -> Snapshot {
        let local = self.backend.is_local();
        let projects = self
            .projects
            .iter()
            .map(|p| ProjectRecord {
                id: p.id.clone(),
                name: p.name.clone(),
                tags: p.tags.clone(),
                tasks: local.then(|| p.tasks.clone()),
            })
            .collect();
        let tasks = local.then(|| {
            self.tasks
                .iter()
                .map(|t| {
                    let record = TaskRecord {
                        title: t.title.clone(),
                        description: t.description.clone(),
                        project_id: t.project.clone(),
                    };
                    (t.id.clone(), record)
                })
                .collect()
        });
        Snapshot { projects, tasks }
    }

    /// Create a project and its note file and directory.
    ///
    /// The name defaults to the id. Existing artifacts are left alone: an
    /// existing note is not truncated and an existing directory is reused.
    /// The snapshot is not written; call [`Store::save`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidProjectId`], [`Error::DuplicateProject`], or
    /// an I/O error from creating the artifacts. The project mapping is
    /// unchanged on error.
    pub fn add_project(
        &mut self,
        id: &str,
        name: Option<&str>,
        tags: Vec<String>,
    ) -> Result<&Project> {
        validate_project_id(id)?;
        if self.project_index(id).is_some() {
            return Err(Error::DuplicateProject(id.to_string()));
        }

        self.create_artifacts(id)?;

        let index = self.projects.len();
        self.projects.push(Project::new(id, name, tags));
        Ok(&self.projects[index])
    }

    fn create_artifacts(&self, id: &str) -> Result<()> {
        fs::create_dir_all(&self.root)?;
        OpenOptions::new().create(true).append(true).open(self.note_path(id))?;
        let dir = self.project_dir(id);
        if !dir.is_dir() {
            fs::create_dir(&dir)?;
        }
        tracing::debug!(project = id, root = %self.root.display(), "created project artifacts");
        Ok(())
    }

    /// Delete a project, its tasks and its artifacts, then save.
    ///
    /// With an external backend every task of the project is deleted in the
    /// tracker first, one at a time. If one of those calls fails the project
    /// and its not yet deleted tasks are kept and the error is returned.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownProject`], the tracker's error, or an I/O
    /// error from removing artifacts or saving.
    pub fn delete_project(&mut self, id: &str) -> Result<()> {
        let index = self.project_index(id).ok_or_else(|| Error::UnknownProject(id.to_string()))?;

        if let Backend::External(source) = &self.backend {
            for task_id in self.projects[index].tasks.clone() {
                source.delete(&task_id)?;
                self.projects[index].tasks.retain(|t| t != &task_id);
                self.tasks.retain(|t| t.id != task_id);
            }
        }

        self.remove_artifacts(id)?;
        self.projects.remove(index);
        self.tasks.retain(|t| t.project.as_deref() != Some(id));
        tracing::debug!(project = id, "deleted project");
        self.save()
    }

    fn remove_artifacts(&self, id: &str) -> Result<()> {
        match fs::remove_file(self.note_path(id)) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
        let dir = self.project_dir(id);
        if dir.is_dir() {
            fs::remove_dir(&dir)?;
        }
        Ok(())
    }

    /// Add a task, optionally to an existing project.
    ///
    /// The text is split into a title line and a description. A local store
    /// generates the id; an external store creates the task in the tracker
    /// and keeps the id the tracker assigned. The snapshot is not written;
    /// call [`Store::save`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownProject`] without changing anything if the
    /// project does not exist, [`Error::IdCollision`] if no unused id could
    /// be generated or the tracker returned an id already in the store, or
    /// the tracker's error.
    pub fn add_task(&mut self, text: &str, project_id: Option<&str>) -> Result<&Task> {
        let project_index = match project_id {
            Some(p) => {
                let index =
                    self.project_index(p).ok_or_else(|| Error::UnknownProject(p.to_string()))?;
                Some(index)
            }
            None => None,
        };

        let id = match &self.backend {
            Backend::Local => self.fresh_id()?,
            Backend::External(source) => tracker_id(&**source, &self.tasks, project_id, text)?,
        };

        let task = Task::from_text(id, text, project_id.map(str::to_string));
        if let Some(index) = project_index {
            self.projects[index].tasks.push(task.id.clone());
        }
        let index = self.tasks.len();
        self.tasks.push(task);
        Ok(&self.tasks[index])
    }

    fn fresh_id(&mut self) -> Result<String> {
        let mut last = String::new();
        for _ in 0..MAX_ID_ATTEMPTS {
            let candidate = self.ids.next_id();
            if self.task(&candidate).is_none() {
                return Ok(candidate);
            }
            tracing::warn!(task = %candidate, "generated task id already in use, regenerating");
            last = candidate;
        }
        Err(Error::IdCollision(last))
    }

    /// The store's root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the snapshot file.
    #[must_use]
    pub fn snapshot_path(&self) -> PathBuf {
        self.root.join(SNAPSHOT_FILE)
    }

    /// Path of a project's note file.
    #[must_use]
    pub fn note_path(&self, id: &str) -> PathBuf {
        self.root.join(format!("{id}.md"))
    }

    /// Path of a project's directory.
    #[must_use]
    pub fn project_dir(&self, id: &str) -> PathBuf {
        self.root.join(id)
    }

    /// The backend this store was opened with.
    #[must_use]
    pub const fn backend(&self) -> &Backend {
        &self.backend
    }

    /// All projects, in insertion order.
    #[must_use]
    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    /// Look up a project by id.
    #[must_use]
    pub fn project(&self, id: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == id)
    }

    fn project_index(&self, id: &str) -> Option<usize> {
        self.projects.iter().position(|p| p.id == id)
    }

    /// All tasks, in load and insertion order.
    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Look up a task by id.
    #[must_use]
    pub fn task(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Tasks that belong to no project.
    pub fn unassigned_tasks(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter().filter(|t| t.project.is_none())
    }

    /// The tasks of one project, in the project's order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownProject`] if the project does not exist.
    pub fn project_tasks(&self, id: &str) -> Result<Vec<&Task>> {
        let project = self.project(id).ok_or_else(|| Error::UnknownProject(id.to_string()))?;
        Ok(project.tasks.iter().filter_map(|task_id| self.task(task_id)).collect())
    }
}

/// Create a task in the tracker and return the id it assigned.
fn tracker_id(
    source: &dyn TaskSource,
    tasks: &[Task],
    project_id: Option<&str>,
    text: &str,
) -> Result<String> {
    let id = source.add(project_id, text)?;
    if tasks.iter().any(|t| t.id == id) {
        return Err(Error::IdCollision(id));
    }
    Ok(id)
}
