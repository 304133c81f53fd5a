// Repository detection, pull loop, retry bookkeeping, run summary

use crate::command::{self, CommandRunner};
use crate::constants::{GIT_DIR, PULL_COMMAND};
use crate::error::UpdateError;
use crate::log::{self, RunLog};
use crate::retry::{RetryOutcome, RetryPolicy};
use std::fs::{File, FileTimes};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Failed attempts per repository, in the order repositories first failed.
///
/// Recording a path again replaces its count; a path listed twice reports the
/// count from its last processing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RetryCounter {
    entries: Vec<(String, u32)>,
}

impl RetryCounter {
    pub fn set(&mut self, repo: &str, count: u32) {
        match self.entries.iter_mut().find(|(path, _)| path == repo) {
            Some(entry) => entry.1 = count,
            None => self.entries.push((repo.to_string(), count)),
        }
    }

    #[must_use]
    pub fn get(&self, repo: &str) -> Option<u32> {
        self.entries
            .iter()
            .find(|(path, _)| path == repo)
            .map(|(_, count)| *count)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.entries.iter().map(|(path, count)| (path.as_str(), *count))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

#[derive(Debug)]
pub enum RepositoryOutcome {
    Updated { retries: u32 },
    Skipped(UpdateError),
    /// Only reachable when the policy has an attempt bound.
    GaveUp { failures: u32, error: UpdateError },
}

#[derive(Debug)]
pub struct RepositoryResult {
    pub path: String,
    pub outcome: RepositoryOutcome,
}

/// Totals for one repository updater run.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub total: usize,
    pub succeeded: usize,
    pub retries: RetryCounter,
    pub skipped: Vec<String>,
    pub failed: Vec<String>,
}

impl RunSummary {
    /// Lines written after the completion banner.
    #[must_use]
    pub fn report_lines(&self) -> Vec<String> {
        let mut lines = vec![
            format!("Total Repositories: {}", self.total),
            format!("Successfully Updated: {}", self.succeeded),
        ];
        if !self.retries.is_empty() {
            lines.push("Repositories with Retries:".to_string());
            lines.extend(
                self.retries
                    .iter()
                    .map(|(repo, count)| format!("{} - Retries: {}", repo, count)),
            );
        }
        if !self.failed.is_empty() {
            lines.push("Repositories Failed:".to_string());
            lines.extend(self.failed.iter().cloned());
        }
        lines
    }

    fn record(&mut self, result: &RepositoryResult) {
        match &result.outcome {
            RepositoryOutcome::Updated { .. } => self.succeeded += 1,
            RepositoryOutcome::Skipped(_) => self.skipped.push(result.path.clone()),
            RepositoryOutcome::GaveUp { .. } => self.failed.push(result.path.clone()),
        }
    }
}

#[must_use]
pub fn is_git_repo(path: &Path) -> bool {
    path.join(GIT_DIR).exists()
}

/// Returns the directory containing `path`; a bare relative name lives in `.`.
#[must_use]
pub fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if parent.as_os_str().is_empty() => PathBuf::from("."),
        Some(parent) => parent.to_path_buf(),
        None => path.to_path_buf(),
    }
}

/// Sets access and modification time of a directory.
pub fn touch_dir(path: &Path, now: SystemTime) -> std::io::Result<()> {
    let dir = open_dir_for_times(path)?;
    dir.set_times(FileTimes::new().set_accessed(now).set_modified(now))
}

#[cfg(windows)]
fn open_dir_for_times(path: &Path) -> std::io::Result<File> {
    use std::os::windows::fs::OpenOptionsExt;

    // Directory handles need backup semantics; set_times needs write access.
    const FILE_FLAG_BACKUP_SEMANTICS: u32 = 0x0200_0000;
    std::fs::OpenOptions::new()
        .write(true)
        .custom_flags(FILE_FLAG_BACKUP_SEMANTICS)
        .open(path)
}

#[cfg(not(windows))]
fn open_dir_for_times(path: &Path) -> std::io::Result<File> {
    File::open(path)
}

/// Pulls every repository in list order and writes the run summary.
pub fn update_repositories<R: CommandRunner + ?Sized>(
    runner: &R,
    log: &RunLog,
    policy: &RetryPolicy,
    list_path: &Path,
    repos: &[String],
) -> anyhow::Result<RunSummary> {
    log.separator()?;
    log.append(&format!(
        "Batch Git Pull Process Started at {}",
        log::local_time()
    ))?;
    log.append(&format!("Repositories file: {}", list_path.display()))?;
    log.separator()?;

    let mut summary = RunSummary {
        total: repos.len(),
        ..RunSummary::default()
    };

    for repo in repos {
        let result = update_repository(runner, log, policy, repo, &mut summary.retries)?;
        summary.record(&result);
    }

    log.append("")?;
    log.banner(&format!(
        "Batch Git Pull Process Completed at {}",
        log::local_time()
    ))?;
    for line in summary.report_lines() {
        log.append(&line)?;
    }
    log.separator()?;

    Ok(summary)
}

/// Pulls one repository, retrying per `policy`. Failed attempts are recorded in `retries`.
pub fn update_repository<R: CommandRunner + ?Sized>(
    runner: &R,
    log: &RunLog,
    policy: &RetryPolicy,
    repo: &str,
    retries: &mut RetryCounter,
) -> anyhow::Result<RepositoryResult> {
    log.append("")?;
    log.section(&format!("Processing repository: {}", repo))?;

    let path = Path::new(repo);
    if !is_git_repo(path) {
        let error = UpdateError::NotARepository {
            path: path.to_path_buf(),
        };
        log.append(&format!("Warning: {}", error))?;
        return Ok(RepositoryResult {
            path: repo.to_string(),
            outcome: RepositoryOutcome::Skipped(error),
        });
    }

    let outcome = policy.run(
        |_| {
            log.append(&format!("Executing: {}", PULL_COMMAND))?;
            Ok(command::run_checked(runner, PULL_COMMAND, Some(path)))
        },
        |failed| {
            retries.set(repo, failed.attempt);
            log.append(&format!(
                "{} failed for {}: {}",
                PULL_COMMAND,
                repo,
                failed.error.to_string().trim()
            ))?;
            if failed.will_retry {
                log.append(&retry_notice(policy, failed.attempt))?;
            }
            Ok(())
        },
    )?;

    let outcome = match outcome {
        RetryOutcome::Succeeded { value, failures } => {
            log.append_output(&value.stdout)?;
            log.append(&format!("Completed update for: {}", repo))?;
            touch_timestamps(log, path, touch_dir)?;
            RepositoryOutcome::Updated { retries: failures }
        }
        RetryOutcome::Exhausted {
            failures,
            last_error,
        } => {
            log.append(&format!(
                "{} failed for {} after {} attempts. Skipping.",
                PULL_COMMAND, repo, failures
            ))?;
            RepositoryOutcome::GaveUp {
                failures,
                error: last_error,
            }
        }
    };

    Ok(RepositoryResult {
        path: repo.to_string(),
        outcome,
    })
}

fn retry_notice(policy: &RetryPolicy, attempt: u32) -> String {
    let secs = policy.delay.as_secs();
    match policy.max_attempts {
        Some(max) => format!("Retrying in {} seconds... (Attempt {}/{})", secs, attempt, max),
        None => format!("Retrying in {} seconds...", secs),
    }
}

/// Best-effort: a timestamp that cannot be set is logged and the run continues.
fn touch_timestamps<T>(log: &RunLog, repo: &Path, touch: T) -> anyhow::Result<()>
where
    T: Fn(&Path, SystemTime) -> std::io::Result<()>,
{
    let now = SystemTime::now();

    if repo.exists() {
        match touch(repo, now) {
            Ok(()) => log.append(&format!(
                "Updated repository directory timestamp: {}",
                repo.display()
            ))?,
            Err(e) => log.append(&format!(
                "Could not update repository directory timestamp for {}: {}",
                repo.display(),
                e
            ))?,
        }
    }

    let parent = parent_dir(repo);
    if parent.exists() {
        match touch(&parent, now) {
            Ok(()) => log.append(&format!(
                "Updated parent directory timestamp: {}",
                parent.display()
            ))?,
            Err(e) => log.append(&format!(
                "Could not update parent directory timestamp for {}: {}",
                parent.display(),
                e
            ))?,
        }
    }
    Ok(())
}
