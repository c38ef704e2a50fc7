//! Real command execution implementation.

use crate::error::Result;
use crate::traits::{CommandOutput, CommandRunner};
use std::process::{Child, Command, Stdio};
use std::time::Duration;

/// ETXTBSY error code (errno 26 on Linux).
const ETXTBSY: i32 = 26;

/// Spawn attempts made while the executable is reported busy.
const MAX_SPAWN_ATTEMPTS: u32 = 20;

/// Spawn a command, retrying a bounded number of times while the executable
/// is reported busy.
///
/// ETXTBSY ("Text file busy") shows up when the tracker binary is being
/// replaced, e.g. during a package upgrade. The last error is returned once
/// the attempts run out.
fn spawn_with_etxtbsy_retry<F>(mut spawn_fn: F) -> std::io::Result<Child>
where
    F: FnMut() -> std::io::Result<Child>,
{
    let mut attempt = 1;
    loop {
        match spawn_fn() {
            Ok(child) => return Ok(child),
            Err(e) if e.raw_os_error() == Some(ETXTBSY) && attempt < MAX_SPAWN_ATTEMPTS => {
                attempt += 1;
                std::thread::sleep(Duration::from_millis(5));
            }
            Err(e) => return Err(e),
        }
    }
}

/// Command runner that spawns real processes and waits for them.
#[derive(Debug, Default, Clone)]
pub struct RealCommandRunner;

impl RealCommandRunner {
    /// Create a new command runner.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl CommandRunner for RealCommandRunner {
    fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput> {
        tracing::debug!(program, ?args, "running external command");

        let mut command = Command::new(program);
        command.args(args).stdin(Stdio::null()).stdout(Stdio::piped()).stderr(Stdio::piped());

        let child = spawn_with_etxtbsy_retry(|| command.spawn())?;
        let output = child.wait_with_output()?;

        let exit_code = output.status.code().unwrap_or(-1);
        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        Ok(CommandOutput { exit_code, stdout, stderr })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_echo() {
        let runner = RealCommandRunner::new();
        let output = runner.run("echo", &["hello"]).unwrap();
        assert!(output.success());
        assert_eq!(output.stdout.trim(), "hello");
    }

    #[test]
    fn test_run_failing_command() {
        let runner = RealCommandRunner::new();
        let output = runner.run("false", &[]).unwrap();
        assert!(!output.success());
        assert_ne!(output.exit_code, 0);
    }

    #[test]
    fn test_run_nonexistent_command() {
        let runner = RealCommandRunner::new();
        let result = runner.run("definitely_not_a_real_command_12345", &[]);
        assert!(result.is_err());
    }

    #[test]
    fn test_spawn_retries_on_etxtbsy() {
        let mut call_count = 0;
        let mut command = Command::new("true");
        command.stdout(Stdio::piped()).stderr(Stdio::piped());

        let result = spawn_with_etxtbsy_retry(|| {
            call_count += 1;
            if call_count < 3 {
                Err(std::io::Error::from_raw_os_error(ETXTBSY))
            } else {
                command.spawn()
            }
        });

        assert!(result.is_ok());
        assert_eq!(call_count, 3);
    }

    #[test]
    fn test_spawn_gives_up_on_persistent_etxtbsy() {
        let mut call_count = 0;

        let result = spawn_with_etxtbsy_retry(|| {
            call_count += 1;
            Err(std::io::Error::from_raw_os_error(ETXTBSY))
        });

        assert_eq!(call_count, MAX_SPAWN_ATTEMPTS);
        assert_eq!(result.unwrap_err().raw_os_error(), Some(ETXTBSY));
    }

    #[test]
    fn test_spawn_propagates_other_errors() {
        let mut call_count = 0;

        let result = spawn_with_etxtbsy_retry(|| {
            call_count += 1;
            Err(std::io::Error::from_raw_os_error(2))
        });

        assert_eq!(call_count, 1);
        assert_eq!(result.unwrap_err().raw_os_error(), Some(2));
    }
}
