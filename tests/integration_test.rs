//! Integration tests for `taskfolio`.

use std::rc::Rc;

use taskfolio::store::snapshot::{self, SNAPSHOT_FILE};
use taskfolio::store::{Backend, SequentialIds, Store};
use taskfolio::taskwarrior::{RawTask, TaskwarriorSource};
use taskfolio::testing::{MemoryTaskSource, MockCommandRunner};
use taskfolio::traits::{CommandOutput, CommandRunner};
use taskfolio::{Error, VERSION};
use tempfile::TempDir;

#[test]
fn test_version_exists() {
    assert!(!VERSION.is_empty());
}

#[test]
fn test_real_command_runner() {
    use taskfolio::command::RealCommandRunner;

    let runner = RealCommandRunner::new();
    let output = runner.run("echo", &["hello"]).unwrap();
    assert!(output.success());
    assert!(output.stdout.contains("hello"));
}

#[test]
fn test_new_project_in_empty_root() {
    let dir = TempDir::new().unwrap();
    let root = dir.path().join("projects");

    let mut store = Store::load(&root, Backend::external(MemoryTaskSource::new("private"))).unwrap();
    assert!(store.projects().is_empty());

    store.add_project("blog", Some("My Blog"), vec!["writing".to_string()]).unwrap();
    store.save().unwrap();

    assert!(root.join("blog.md").is_file());
    assert!(root.join("blog").is_dir());
    let saved = std::fs::read_to_string(root.join(SNAPSHOT_FILE)).unwrap();
    assert!(saved.contains("\"name\": \"My Blog\""));
    assert!(saved.ends_with('\n'));
}

#[test]
fn test_orphan_tasks_are_ignored() {
    let dir = TempDir::new().unwrap();
    let source = MemoryTaskSource::new("private");
    let mut store = Store::load(dir.path(), Backend::external(source.clone())).unwrap();
    store.add_project("blog", None, vec![]).unwrap();
    store.save().unwrap();

    source.push(RawTask::pending("1", "Draft").with_project("blog"));
    source.push(RawTask::pending("2", "Lost").with_project("vanished"));
    source.push(RawTask::pending("3", "Floating"));

    let store = Store::load(dir.path(), Backend::external(source)).unwrap();
    let ids: Vec<&str> = store.tasks().iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, vec!["1", "3"]);
    assert_eq!(store.project("blog").unwrap().tasks, vec!["1"]);
    assert_eq!(store.unassigned_tasks().count(), 1);
}

#[test]
fn test_local_round_trip() {
    let dir = TempDir::new().unwrap();
    let mut store =
        Store::load_with_ids(dir.path(), Backend::Local, Box::new(SequentialIds::default()))
            .unwrap();
    store.add_project("home", Some("Home"), vec!["chores".to_string()]).unwrap();
    store.add_task("Fix tap\nKitchen, not bathroom", Some("home")).unwrap();
    store.add_task("Call bank", None).unwrap();
    store.save().unwrap();

    let reloaded = Store::load(dir.path(), Backend::Local).unwrap();
    assert_eq!(reloaded.projects(), store.projects());
    assert_eq!(reloaded.tasks(), store.tasks());

    let task = reloaded.task("task-0000").unwrap();
    assert_eq!(task.title, "Fix tap");
    assert_eq!(task.description.as_deref(), Some("Kitchen, not bathroom"));

    let on_disk = snapshot::read(&dir.path().join(SNAPSHOT_FILE)).unwrap().unwrap();
    assert_eq!(on_disk.tasks.map(|t| t.len()), Some(2));
}

#[test]
fn test_context_filters_external_tasks() {
    let dir = TempDir::new().unwrap();
    Store::load(dir.path(), Backend::Local).unwrap().save().unwrap();

    let work = MemoryTaskSource::new("work");
    let private = MemoryTaskSource::new("private");
    for source in [&work, &private] {
        source.push(RawTask::pending("1", "Shell prompt").with_tags(&["sh"]));
        source.push(RawTask::pending("2", "Plugins").with_tags(&["nvim"]));
        source.push(RawTask::pending("3", "Groceries"));
    }

    let titles = |source: MemoryTaskSource| -> Vec<String> {
        let store = Store::load(dir.path(), Backend::external(source)).unwrap();
        store.tasks().iter().map(|t| t.title.clone()).collect()
    };
    assert_eq!(titles(work), vec!["Shell prompt", "Plugins"]);
    assert_eq!(titles(private), vec!["Plugins", "Groceries"]);

    let result = Store::load(dir.path(), Backend::external(MemoryTaskSource::new("travel")));
    assert!(matches!(result, Err(Error::UnsupportedContext(c)) if c == "travel"));
}

#[test]
fn test_taskwarrior_store_lifecycle() {
    let dir = TempDir::new().unwrap();
    let mut store = Store::load(dir.path(), Backend::Local).unwrap();
    store.add_project("dots", None, vec![]).unwrap();
    store.save().unwrap();

    let export = r#"[
        {"id": 4, "description": "Prompt colors", "status": "pending", "tags": ["sh"], "project": "dots"},
        {"id": 5, "description": "Alias cleanup", "status": "pending", "tags": ["sh"], "project": "dots"},
        {"id": 0, "description": "Done already", "status": "completed", "tags": ["sh"], "project": "dots"}
    ]"#;
    let mut runner = MockCommandRunner::new();
    runner.expect("task", &["export"], CommandOutput::ok(export));
    runner.expect("task", &["_get", "rc.context"], CommandOutput::ok("work\n"));
    runner.expect("task", &["rc.confirmation=off", "delete", "4"], CommandOutput::ok(""));
    runner.expect("task", &["rc.confirmation=off", "delete", "5"], CommandOutput::ok(""));
    let runner = Rc::new(runner);

    let source = TaskwarriorSource::new(Rc::clone(&runner));
    let mut store = Store::load(dir.path(), Backend::external(source)).unwrap();
    assert_eq!(store.project("dots").unwrap().tasks, vec!["4", "5"]);

    store.delete_project("dots").unwrap();
    runner.verify();

    assert!(store.projects().is_empty());
    assert!(!dir.path().join("dots.md").exists());
    let on_disk = snapshot::read(&dir.path().join(SNAPSHOT_FILE)).unwrap().unwrap();
    assert!(on_disk.projects.is_empty());
}

#[test]
fn test_taskwarrior_add_then_delete_uses_tracker_ids() {
    let dir = TempDir::new().unwrap();
    let mut runner = MockCommandRunner::new();
    runner.expect(
        "task",
        &["add", "proj:blog", "due:today", "Draft post"],
        CommandOutput::ok("Created task 9.\n"),
    );
    runner.expect("task", &["rc.confirmation=off", "delete", "9"], CommandOutput::ok(""));
    let runner = Rc::new(runner);

    let source = TaskwarriorSource::new(Rc::clone(&runner));
    let mut store = Store::load(dir.path(), Backend::external(source)).unwrap();
    store.add_project("blog", None, vec![]).unwrap();
    assert_eq!(store.add_task("Draft post", Some("blog")).unwrap().id, "9");

    store.delete_project("blog").unwrap();
    runner.verify();
    assert!(store.tasks().is_empty());
}

#[test]
fn test_taskwarrior_failure_surfaces_command() {
    let dir = TempDir::new().unwrap();
    Store::load(dir.path(), Backend::Local).unwrap().save().unwrap();

    let mut runner = MockCommandRunner::new();
    runner.expect("task", &["export"], CommandOutput::failed(2, "database locked\n"));

    let result = Store::load(dir.path(), Backend::external(TaskwarriorSource::new(runner)));
    match result {
        Err(Error::CommandFailed { command, exit_code, stderr }) => {
            assert_eq!(command, "task export");
            assert_eq!(exit_code, 2);
            assert_eq!(stderr, "database locked");
        }
        other => panic!("expected CommandFailed, got {other:?}"),
    }
}
