//! # `taskfolio`
//!
//! Project notes on top of a task tracker. A store keeps one markdown note
//! and one directory per project next to a JSON snapshot, and groups tasks
//! from Taskwarrior (or from the snapshot itself) under their projects.

#[cfg(feature = "cli")]
pub mod cli;
pub mod command;
pub mod config;
pub mod error;
#[cfg(feature = "cli")]
pub mod logging;
pub mod paths;
pub mod store;
pub mod taskwarrior;
pub mod templates;
pub mod testing;
pub mod traits;

pub use error::{Error, Result};
pub use store::{Backend, Project, Store, Task, TaskStatus};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
