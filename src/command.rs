//! Shell command execution.
//!
//! This module provides a thin wrapper around the host shell,
//! handling command execution and failure classification.

use crate::error::UpdateError;
use std::path::Path;

/// Captured output of a command that exited successfully.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn new(stdout: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self {
            stdout: stdout.into(),
            stderr: stderr.into(),
        }
    }

    /// Applies the stderr-only heuristic to an exit-success output.
    ///
    /// Some tools report problems on stderr and still exit 0; output with stderr text
    /// and no stdout text counts as a failure carrying that stderr.
    pub fn into_checked(self, command: &str) -> Result<CommandOutput, UpdateError> {
        if !self.stderr.is_empty() && self.stdout.trim().is_empty() {
            return Err(UpdateError::command_failed(command, self.stderr));
        }
        Ok(self)
    }
}

/// Runs one external command at a time.
///
/// `Ok` means the process started and exited zero. Anything else is
/// `UpdateError::CommandFailed`.
pub trait CommandRunner {
    fn run(&self, command: &str, cwd: Option<&Path>) -> Result<CommandOutput, UpdateError>;
}

/// Runs commands through `sh -c` (or `cmd /C` on Windows).
#[derive(Debug, Clone, Copy, Default)]
pub struct ShellRunner;

impl CommandRunner for ShellRunner {
    fn run(&self, command: &str, cwd: Option<&Path>) -> Result<CommandOutput, UpdateError> {
        let mut cmd = shell_command(command);
        if let Some(dir) = cwd {
            cmd.current_dir(dir);
        }

        let output = cmd.output().map_err(|e| {
            UpdateError::command_failed(command, format!("Failed to execute '{}': {}", command, e))
        })?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        if output.status.success() {
            Ok(CommandOutput { stdout, stderr })
        } else {
            Err(UpdateError::command_failed(
                command,
                failure_message(command, output.status, &stderr),
            ))
        }
    }
}

#[cfg(windows)]
fn shell_command(command: &str) -> std::process::Command {
    let mut cmd = std::process::Command::new("cmd");
    cmd.args(["/C", command]);
    cmd
}

#[cfg(not(windows))]
fn shell_command(command: &str) -> std::process::Command {
    let mut cmd = std::process::Command::new("sh");
    cmd.args(["-c", command]);
    cmd
}

fn failure_message(command: &str, status: std::process::ExitStatus, stderr: &str) -> String {
    let stderr = stderr.trim();
    if stderr.is_empty() {
        format!("Command failed: {} ({})", command, status)
    } else {
        stderr.to_string()
    }
}

/// Runs `command` and applies the stderr-only heuristic on success.
pub fn run_checked<R: CommandRunner + ?Sized>(
    runner: &R,
    command: &str,
    cwd: Option<&Path>,
) -> Result<CommandOutput, UpdateError> {
    runner.run(command, cwd)?.into_checked(command)
}
