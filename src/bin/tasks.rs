//! `tasks` binary: a self-contained task list grouped into projects.

use std::process::ExitCode;

use clap::Parser;
use taskfolio::cli::{run_tasks, TasksCli};

fn main() -> ExitCode {
    taskfolio::logging::init();

    let output = run_tasks(TasksCli::parse());

    for line in output.stdout {
        println!("{line}");
    }
    for msg in output.stderr {
        eprintln!("{msg}");
    }

    output.exit_code
}
