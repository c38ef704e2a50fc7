//! `projects` binary: project notes linked to Taskwarrior.
//!
//! This binary is a thin wrapper that parses arguments and delegates to the library.

use std::process::ExitCode;

use clap::Parser;
use taskfolio::cli::{run_projects, ProjectsCli};

fn main() -> ExitCode {
    taskfolio::logging::init();

    let output = run_projects(ProjectsCli::parse());

    for line in output.stdout {
        println!("{line}");
    }
    for msg in output.stderr {
        eprintln!("{msg}");
    }

    output.exit_code
}
