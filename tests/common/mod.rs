//! Test infrastructure for daily-updaters integration tests.

#![allow(dead_code)]

use anyhow::Result;
use daily_updaters::command::{CommandOutput, CommandRunner};
use daily_updaters::error::UpdateError;
use daily_updaters::log::{self, RunLog};
use daily_updaters::retry::RetryPolicy;
use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;
use tempfile::TempDir;

/// One scripted response of the fake runner.
#[derive(Debug, Clone)]
pub enum Step {
    /// Exit zero with the given stdout and stderr.
    Exit(&'static str, &'static str),
    /// Non-zero exit carrying this reason.
    Fail(&'static str),
}

/// A `CommandRunner` that replays queued steps per command string.
///
/// The last queued step of a command repeats forever.
#[derive(Default)]
pub struct ScriptedRunner {
    scripts: Mutex<HashMap<String, VecDeque<Step>>>,
    calls: Mutex<Vec<(String, Option<PathBuf>)>>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn script(self, command: &str, steps: &[Step]) -> Self {
        self.scripts
            .lock()
            .unwrap()
            .insert(command.to_string(), steps.iter().cloned().collect());
        self
    }

    pub fn calls(&self) -> Vec<(String, Option<PathBuf>)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self, command: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(c, _)| c == command)
            .count()
    }
}

impl CommandRunner for ScriptedRunner {
    fn run(&self, command: &str, cwd: Option<&Path>) -> Result<CommandOutput, UpdateError> {
        self.calls
            .lock()
            .unwrap()
            .push((command.to_string(), cwd.map(Path::to_path_buf)));

        let mut scripts = self.scripts.lock().unwrap();
        let step = match scripts.get_mut(command) {
            Some(queue) if queue.len() > 1 => queue.pop_front(),
            Some(queue) => queue.front().cloned(),
            None => None,
        };
        match step {
            Some(Step::Exit(stdout, stderr)) => Ok(CommandOutput::new(stdout, stderr)),
            Some(Step::Fail(reason)) => Err(UpdateError::command_failed(command, reason)),
            None => Err(UpdateError::command_failed(command, "command not scripted")),
        }
    }
}

/// Retry policy without delays.
pub fn fast_policy(max_attempts: Option<u32>) -> RetryPolicy {
    RetryPolicy {
        max_attempts,
        delay: Duration::ZERO,
    }
}

/// A log file inside a temporary directory.
pub struct TestLog {
    _temp_dir: TempDir,
    pub log: RunLog,
}

impl TestLog {
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let log = RunLog::new(temp_dir.path().join("test.log"), log::no_echo);
        Ok(Self {
            _temp_dir: temp_dir,
            log,
        })
    }

    /// Logged messages with the `[timestamp] ` prefix removed.
    pub fn messages(&self) -> Result<Vec<String>> {
        let content = std::fs::read_to_string(self.log.path())?;
        Ok(content
            .lines()
            .map(|line| {
                line.split_once("] ")
                    .map_or(line, |(_, message)| message)
                    .to_string()
            })
            .collect())
    }

    pub fn count(&self, message: &str) -> Result<usize> {
        Ok(self.messages()?.iter().filter(|m| *m == message).count())
    }

    pub fn contains(&self, message: &str) -> Result<bool> {
        Ok(self.count(message)? > 0)
    }
}

/// Creates a directory that looks like a checkout (has a `.git` directory).
pub fn fake_checkout(parent: &Path, name: &str) -> Result<String> {
    let path = parent.join(name);
    std::fs::create_dir_all(path.join(".git"))?;
    Ok(path.to_string_lossy().into_owned())
}

pub fn run_git(repo: &Path, args: &[&str]) -> Result<String> {
    let output = std::process::Command::new("git")
        .current_dir(repo)
        .args(args)
        .output()?;
    if !output.status.success() {
        anyhow::bail!(
            "git {} failed: {}",
            args.join(" "),
            String::from_utf8_lossy(&output.stderr)
        );
    }
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// A temporary git repository with a bare remote.
/// Automatically cleaned up when dropped.
pub struct TestRepo {
    _temp_dir: TempDir,
    path: PathBuf,
    remote: PathBuf,
}

impl TestRepo {
    /// Creates a repository with one commit on master, pushed to a bare remote.
    pub fn with_remote() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join("work");
        let remote = temp_dir.path().join("remote.git");
        std::fs::create_dir_all(&path)?;
        std::fs::create_dir_all(&remote)?;

        run_git(&remote, &["init", "--bare", "-b", "master"])?;
        run_git(&path, &["init", "-b", "master"])?;
        configure_identity(&path)?;
        std::fs::write(path.join("README.md"), "# Test Repo\n")?;
        run_git(&path, &["add", "README.md"])?;
        run_git(&path, &["commit", "-m", "Initial commit"])?;
        run_git(&path, &["remote", "add", "origin", &remote.to_string_lossy()])?;
        run_git(&path, &["push", "-u", "origin", "master"])?;

        Ok(Self {
            _temp_dir: temp_dir,
            path,
            remote,
        })
    }

    /// Clones the remote next to the working repository.
    pub fn clone_remote(&self, name: &str) -> Result<PathBuf> {
        let parent = self
            .path
            .parent()
            .ok_or_else(|| anyhow::anyhow!("test repo has no parent"))?;
        run_git(parent, &["clone", &self.remote.to_string_lossy(), name])?;
        let clone = parent.join(name);
        configure_identity(&clone)?;
        Ok(clone)
    }

    /// Commits a new file and pushes it to the remote.
    pub fn push_file(&self, name: &str, content: &str) -> Result<()> {
        std::fs::write(self.path.join(name), content)?;
        run_git(&self.path, &["add", name])?;
        run_git(&self.path, &["commit", "-m", &format!("Add {}", name)])?;
        run_git(&self.path, &["push", "origin", "master"])?;
        Ok(())
    }

    /// Points origin at a location that does not exist.
    pub fn break_remote(&self, repo: &Path) -> Result<()> {
        run_git(repo, &["remote", "set-url", "origin", "/nope/remote.git"])?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn configure_identity(repo: &Path) -> Result<()> {
    run_git(repo, &["config", "user.email", "test@example.com"])?;
    run_git(repo, &["config", "user.name", "Test User"])?;
    Ok(())
}
