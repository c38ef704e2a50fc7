//! Core traits for testability and abstraction.

use crate::error::Result;
use crate::taskwarrior::RawTask;

/// Output from a command execution.
#[derive(Debug, Clone, Default)]
pub struct CommandOutput {
    /// The exit code of the command.
    pub exit_code: i32,
    /// The stdout output.
    pub stdout: String,
    /// The stderr output.
    pub stderr: String,
}

impl CommandOutput {
    /// Build a successful output with the given stdout.
    #[must_use]
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self { exit_code: 0, stdout: stdout.into(), stderr: String::new() }
    }

    /// Build a failed output with the given exit code and stderr.
    #[must_use]
    pub fn failed(exit_code: i32, stderr: impl Into<String>) -> Self {
        Self { exit_code, stdout: String::new(), stderr: stderr.into() }
    }

    /// Check if the command succeeded (exit code 0).
    #[must_use]
    pub const fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Trait for running external programs.
///
/// This trait abstracts command execution for testability. Calls block until
/// the program exits; there is no timeout.
pub trait CommandRunner {
    /// Run a program with the given arguments and collect its output.
    ///
    /// A non-zero exit code is reported through [`CommandOutput::exit_code`],
    /// not as an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the program cannot be spawned or waited on.
    fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput>;
}

impl<T: CommandRunner + ?Sized> CommandRunner for &T {
    fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput> {
        (**self).run(program, args)
    }
}

impl<T: CommandRunner + ?Sized> CommandRunner for std::rc::Rc<T> {
    fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput> {
        (**self).run(program, args)
    }
}

/// The capabilities the store needs from an external task tracker.
///
/// The production implementation shells out to Taskwarrior; tests use
/// [`crate::testing::MemoryTaskSource`].
#[allow(clippy::missing_errors_doc)]
pub trait TaskSource {
    /// Export every task the tracker knows about, including closed ones.
    fn export(&self) -> Result<Vec<RawTask>>;

    /// The name of the tracker's active context.
    fn context(&self) -> Result<String>;

    /// Delete a task by its tracker id.
    fn delete(&self, id: &str) -> Result<()>;

    /// Create a task, optionally assigned to a project, and return the id
    /// the tracker gave it.
    fn add(&self, project: Option<&str>, text: &str) -> Result<String>;
}

/// Source of fresh task identifiers.
pub trait IdGenerator {
    /// Produce the next identifier.
    fn next_id(&mut self) -> String;
}
