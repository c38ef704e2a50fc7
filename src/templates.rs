//! Project templates.
//!
//! A template is a named list of task texts from the configuration file.
//! Applying it to a project adds one task per entry, in order.

use crate::config::Config;
use crate::error::{Error, Result};
use crate::store::Store;

/// Look up a template's task texts.
///
/// # Errors
///
/// Returns [`Error::UnknownTemplate`] if no template has this name.
pub fn lookup<'a>(config: &'a Config, name: &str) -> Result<&'a [String]> {
    config
        .templates
        .get(name)
        .map(Vec::as_slice)
        .ok_or_else(|| Error::UnknownTemplate(name.to_string()))
}

/// Add every task of a template to an existing project.
///
/// Returns the ids of the created tasks. Stops at the first failing task;
/// tasks added before it stay in the store.
///
/// # Errors
///
/// Returns [`Error::UnknownTemplate`], or whatever [`Store::add_task`]
/// reports.
pub fn apply(store: &mut Store, config: &Config, project_id: &str, name: &str) -> Result<Vec<String>> {
    let entries = lookup(config, name)?;
    let mut created = Vec::with_capacity(entries.len());
    for text in entries {
        created.push(store.add_task(text, Some(project_id))?.id.clone());
    }
    tracing::debug!(project = project_id, template = name, count = created.len(), "applied template");
    Ok(created)
}
