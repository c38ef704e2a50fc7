//! Testing utilities and mock implementations.
//!
//! These types are provided for use in tests. They may appear unused in
//! the library itself but are consumed by unit and integration tests.

#![allow(dead_code)]
#![allow(clippy::needless_pass_by_ref_mut)] // &mut self for ergonomics with RefCell

use crate::error::{Error, Result};
use crate::taskwarrior::RawTask;
use crate::traits::{CommandOutput, CommandRunner, IdGenerator, TaskSource};
use std::cell::RefCell;
use std::collections::{HashSet, VecDeque};
use std::rc::Rc;

/// A mock command runner for testing.
///
/// Records expected commands and their outputs, then verifies they were called.
#[derive(Debug, Default)]
pub struct MockCommandRunner {
    expectations: RefCell<Vec<(String, Vec<String>, CommandOutput)>>,
    call_index: RefCell<usize>,
}

impl MockCommandRunner {
    /// Create a new mock command runner.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an expected command and its output.
    pub fn expect(&mut self, program: &str, args: &[&str], output: CommandOutput) {
        self.expectations.borrow_mut().push((
            program.to_string(),
            args.iter().map(|s| (*s).to_string()).collect(),
            output,
        ));
    }

    /// Verify all expected commands were called.
    ///
    /// # Panics
    ///
    /// Panics if not all expected commands were called.
    pub fn verify(&self) {
        let index = *self.call_index.borrow();
        let expected = self.expectations.borrow().len();
        assert_eq!(
            index, expected,
            "Expected {expected} command calls, but only {index} were made"
        );
    }
}

impl CommandRunner for MockCommandRunner {
    fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput> {
        let mut index = self.call_index.borrow_mut();
        let expectations = self.expectations.borrow();

        assert!(
            *index < expectations.len(),
            "Unexpected command call: {program} {args:?} (no more expectations)"
        );

        let (exp_program, exp_args, output) = &expectations[*index];
        let args_vec: Vec<String> = args.iter().map(|s| (*s).to_string()).collect();

        assert!(
            program == exp_program && &args_vec == exp_args,
            "Command mismatch at index {}:\n  Expected: {} {:?}\n  Got: {} {:?}",
            *index,
            exp_program,
            exp_args,
            program,
            args
        );

        *index += 1;
        Ok(output.clone())
    }
}

/// A command runner that always fails to spawn, for testing error paths.
#[derive(Debug, Default)]
pub struct FailingCommandRunner {
    error_message: String,
}

impl FailingCommandRunner {
    /// Create a new failing command runner with the specified error message.
    #[must_use]
    pub fn new(error_message: impl Into<String>) -> Self {
        Self { error_message: error_message.into() }
    }
}

impl CommandRunner for FailingCommandRunner {
    fn run(&self, _program: &str, _args: &[&str]) -> Result<CommandOutput> {
        Err(std::io::Error::other(self.error_message.clone()).into())
    }
}

#[derive(Debug, Default)]
struct MemoryState {
    records: Vec<RawTask>,
    context: String,
    added: Vec<(Option<String>, String)>,
    deleted: Vec<String>,
    failing_deletes: HashSet<String>,
    next_id: u64,
}

/// In-memory stand-in for the external tracker.
///
/// Clones share state, so a test can hand one clone to a store and inspect
/// the other afterwards.
#[derive(Debug, Clone, Default)]
pub struct MemoryTaskSource {
    state: Rc<RefCell<MemoryState>>,
}

impl MemoryTaskSource {
    /// Create an empty tracker in the given context.
    #[must_use]
    pub fn new(context: &str) -> Self {
        let source = Self::default();
        {
            let mut state = source.state.borrow_mut();
            state.context = context.to_string();
            state.next_id = 1;
        }
        source
    }

    /// Add a record that will appear in the export.
    pub fn push(&self, record: RawTask) {
        self.state.borrow_mut().records.push(record);
    }

    /// Make deleting this id fail with a non-zero exit.
    pub fn fail_delete(&self, id: &str) {
        self.state.borrow_mut().failing_deletes.insert(id.to_string());
    }

    /// Ids deleted so far, in call order.
    #[must_use]
    pub fn deleted(&self) -> Vec<String> {
        self.state.borrow().deleted.clone()
    }

    /// `(project, text)` pairs added so far, in call order.
    #[must_use]
    pub fn added(&self) -> Vec<(Option<String>, String)> {
        self.state.borrow().added.clone()
    }
}

impl TaskSource for MemoryTaskSource {
    fn export(&self) -> Result<Vec<RawTask>> {
        Ok(self.state.borrow().records.clone())
    }

    fn context(&self) -> Result<String> {
        Ok(self.state.borrow().context.clone())
    }

    fn delete(&self, id: &str) -> Result<()> {
        let mut state = self.state.borrow_mut();
        if state.failing_deletes.contains(id) {
            return Err(Error::CommandFailed {
                command: format!("task delete {id}"),
                exit_code: 1,
                stderr: "refused".to_string(),
            });
        }
        for record in state.records.iter_mut().filter(|r| r.id == id) {
            record.status = "deleted".to_string();
        }
        state.deleted.push(id.to_string());
        Ok(())
    }

    fn add(&self, project: Option<&str>, text: &str) -> Result<String> {
        let mut state = self.state.borrow_mut();
        let id = state.next_id.to_string();
        state.next_id += 1;
        let mut record = RawTask::pending(id.clone(), text);
        record.project = project.map(str::to_string);
        state.records.push(record);
        state.added.push((project.map(str::to_string), text.to_string()));
        Ok(id)
    }
}

/// Id generator that hands out a fixed list of ids, then falls back to a counter.
#[derive(Debug, Default)]
pub struct ScriptedIds {
    queue: VecDeque<String>,
    fallback: u64,
}

impl ScriptedIds {
    /// Hand out these ids first, in order.
    #[must_use]
    pub fn new(ids: &[&str]) -> Self {
        Self { queue: ids.iter().map(|s| (*s).to_string()).collect(), fallback: 0 }
    }
}

impl IdGenerator for ScriptedIds {
    fn next_id(&mut self) -> String {
        self.queue.pop_front().unwrap_or_else(|| {
            self.fallback += 1;
            format!("fallback-{}", self.fallback)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_command_runner() {
        let mut runner = MockCommandRunner::new();
        runner.expect("echo", &["hello"], CommandOutput::ok("hello\n"));

        let output = runner.run("echo", &["hello"]).unwrap();
        assert_eq!(output.stdout, "hello\n");
        runner.verify();
    }

    #[test]
    #[should_panic(expected = "Command mismatch")]
    fn test_mock_command_runner_wrong_command() {
        let mut runner = MockCommandRunner::new();
        runner.expect("echo", &["hello"], CommandOutput::default());

        let _ = runner.run("echo", &["world"]);
    }

    #[test]
    #[should_panic(expected = "no more expectations")]
    fn test_mock_command_runner_too_many_calls() {
        let runner = MockCommandRunner::new();
        let _ = runner.run("echo", &["hello"]);
    }

    #[test]
    #[should_panic(expected = "Expected 1 command calls")]
    fn test_mock_command_runner_verify_fails() {
        let mut runner = MockCommandRunner::new();
        runner.expect("echo", &["hello"], CommandOutput::default());
        runner.verify();
    }

    #[test]
    fn test_failing_command_runner() {
        let runner = FailingCommandRunner::new("test error");
        assert!(runner.run("any", &["args"]).is_err());
    }

    #[test]
    fn test_memory_source_shares_state_between_clones() {
        let source = MemoryTaskSource::new("private");
        let handle = source.clone();

        source.add(Some("blog"), "Write post").unwrap();
        source.delete("1").unwrap();

        assert_eq!(handle.added(), vec![(Some("blog".to_string()), "Write post".to_string())]);
        assert_eq!(handle.deleted(), vec!["1"]);
        assert_eq!(handle.export().unwrap()[0].status, "deleted");
    }

    #[test]
    fn test_memory_source_failing_delete() {
        let source = MemoryTaskSource::new("private");
        source.fail_delete("9");
        assert!(matches!(source.delete("9"), Err(Error::CommandFailed { .. })));
        assert!(source.deleted().is_empty());
    }

    #[test]
    fn test_scripted_ids() {
        let mut ids = ScriptedIds::new(&["a", "b"]);
        assert_eq!(ids.next_id(), "a");
        assert_eq!(ids.next_id(), "b");
        assert_eq!(ids.next_id(), "fallback-1");
    }
}
