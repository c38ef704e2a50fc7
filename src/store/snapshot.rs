//! On-disk JSON snapshot of a store.
//!
//! The snapshot lives at `<root>/data.json`. With an external backend only
//! project metadata is written:
//!
//! ```json
//! {"projects": [{"id": "blog", "name": "My Blog", "tags": ["writing"]}]}
//! ```
//!
//! A self-contained store also writes each project's task list and a `tasks`
//! object keyed by task id. Task order in that object is preserved.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::ser::PrettyFormatter;
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::fs;
use std::io::Write;
use std::path::Path;

/// Snapshot file name inside the store root.
pub const SNAPSHOT_FILE: &str = "data.json";

/// Persisted fields of a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectRecord {
    /// Project id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Tags in display order.
    pub tags: Vec<String>,
    /// Task ids; only present for self-contained stores.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tasks: Option<Vec<String>>,
}

/// Persisted fields of a locally owned task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRecord {
    /// Title line.
    pub title: String,
    /// Longer description.
    #[serde(default)]
    pub description: Option<String>,
    /// Owning project.
    #[serde(default)]
    pub project_id: Option<String>,
}

/// Decoded snapshot contents.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    /// Projects in file order.
    pub projects: Vec<ProjectRecord>,
    /// Tasks in file order, keyed by id; `None` for metadata-only snapshots.
    pub tasks: Option<Vec<(String, TaskRecord)>>,
}

#[derive(Serialize, Deserialize)]
struct Wire {
    projects: Vec<ProjectRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tasks: Option<Map<String, Value>>,
}

impl Snapshot {
    /// Decode snapshot text.
    ///
    /// # Errors
    ///
    /// Returns a description of the problem if the text is not valid JSON,
    /// lacks a required field or repeats a project id.
    fn decode(text: &str) -> std::result::Result<Self, String> {
        let wire: Wire = serde_json::from_str(text).map_err(|e| e.to_string())?;

        let mut seen = HashSet::new();
        for project in &wire.projects {
            if !seen.insert(project.id.as_str()) {
                return Err(format!("project '{}' appears more than once", project.id));
            }
        }

        let tasks = match wire.tasks {
            None => None,
            Some(map) => {
                let mut tasks = Vec::with_capacity(map.len());
                for (id, value) in map {
                    let record: TaskRecord = serde_json::from_value(value)
                        .map_err(|e| format!("task '{id}': {e}"))?;
                    tasks.push((id, record));
                }
                Some(tasks)
            }
        };

        Ok(Self { projects: wire.projects, tasks })
    }

    /// Encode as pretty-printed JSON with four-space indentation.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn encode(&self) -> Result<String> {
        let tasks = match &self.tasks {
            None => None,
            Some(tasks) => {
                let mut map = Map::new();
                for (id, record) in tasks {
                    map.insert(id.clone(), serde_json::to_value(record)?);
                }
                Some(map)
            }
        };
        let wire = Wire { projects: self.projects.clone(), tasks };

        let mut buf = Vec::new();
        let mut serializer =
            serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
        wire.serialize(&mut serializer)?;
        buf.push(b'\n');
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}

/// Read the snapshot at `path`. A missing file yields `None`.
///
/// # Errors
///
/// Returns [`Error::CorruptStore`] if the file cannot be decoded, or an I/O
/// error if it cannot be read.
pub fn read(path: &Path) -> Result<Option<Snapshot>> {
    if !path.exists() {
        return Ok(None);
    }
    let text = fs::read_to_string(path)?;
    Snapshot::decode(&text)
        .map(Some)
        .map_err(|reason| Error::CorruptStore { path: path.to_path_buf(), reason })
}

/// Write the snapshot to `path`, replacing any previous contents.
///
/// The data goes to a sibling temporary file first and is then renamed over
/// the target.
///
/// # Errors
///
/// Returns an error if encoding or any filesystem step fails.
pub fn write(path: &Path, snapshot: &Snapshot) -> Result<()> {
    let data = snapshot.encode()?;
    let tmp = path.with_extension("json.tmp");
    let mut file = fs::File::create(&tmp)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    fs::rename(&tmp, path)?;
    Ok(())
}
