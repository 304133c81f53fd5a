//! Package manager self-updates.
//!
//! Each tracked tool is updated with a capped number of attempts. The tool's
//! version is recorded before and after so the log shows what changed.

use crate::command::{self, CommandRunner};
use crate::constants::UNKNOWN_VERSION;
use crate::error::UpdateError;
use crate::log::{self, RunLog};
use crate::retry::{RetryOutcome, RetryPolicy};

/// A package manager with its version query and update command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolSpec {
    /// Short name used in the summary, uppercased.
    pub key: &'static str,
    /// Human label used in section headers and failure lines.
    pub label: &'static str,
    pub version_command: &'static str,
    pub update_command: &'static str,
}

/// Tools updated by `package-managers-update`, in processing order.
pub const TOOLS: [ToolSpec; 3] = [
    ToolSpec {
        key: "npm",
        label: "npm",
        version_command: "npm -v",
        update_command: "npm install -g npm",
    },
    ToolSpec {
        key: "yarn",
        label: "Yarn (Corepack)",
        version_command: "yarn -v",
        update_command: "corepack prepare yarn@stable --activate",
    },
    ToolSpec {
        key: "pnpm",
        label: "pnpm (Corepack)",
        version_command: "pnpm -v",
        update_command: "corepack prepare pnpm@latest --activate",
    },
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateResult {
    pub succeeded: bool,
    pub version_before: String,
    /// Equals `version_before` when every attempt failed; the version is not re-queried.
    pub version_after: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolReport {
    pub key: &'static str,
    pub result: UpdateResult,
}

impl ToolReport {
    #[must_use]
    pub fn summary_line(&self) -> String {
        format!(
            "{}: {} | Before: {} | After: {}",
            self.key.to_uppercase(),
            if self.result.succeeded {
                "Updated"
            } else {
                "Failed"
            },
            self.result.version_before,
            self.result.version_after
        )
    }
}

/// Runs a version command and returns its trimmed stdout.
///
/// No stderr heuristic here: many tools print notices on stderr next to a version.
pub fn query_version<R: CommandRunner + ?Sized>(
    runner: &R,
    command: &str,
) -> Result<String, UpdateError> {
    runner
        .run(command, None)
        .map(|output| output.stdout.trim().to_string())
}

/// Best-effort version lookup: a failed query is logged and reported as `Unknown`.
fn version_or_unknown<R: CommandRunner + ?Sized>(
    runner: &R,
    log: &RunLog,
    command: &str,
) -> anyhow::Result<String> {
    match query_version(runner, command) {
        Ok(version) => Ok(version),
        Err(e) => {
            log.append(&format!(
                "Could not query version with '{}': {}",
                command,
                e.to_string().trim()
            ))?;
            Ok(UNKNOWN_VERSION.to_string())
        }
    }
}

/// Updates every tool in order and writes the summary block.
pub fn update_package_managers<R: CommandRunner + ?Sized>(
    runner: &R,
    log: &RunLog,
    policy: &RetryPolicy,
    tools: &[ToolSpec],
) -> anyhow::Result<Vec<ToolReport>> {
    log.banner(&format!(
        "Package Managers Update Started at {}",
        log::local_time()
    ))?;

    let mut reports = Vec::with_capacity(tools.len());
    for tool in tools {
        let result = update_tool(runner, log, policy, tool)?;
        reports.push(ToolReport {
            key: tool.key,
            result,
        });
    }

    log.append("")?;
    log.banner(&format!(
        "Package Managers Update Completed at {}",
        log::local_time()
    ))?;
    for report in &reports {
        log.append(&report.summary_line())?;
    }
    log.separator()?;

    Ok(reports)
}

/// Updates one tool, attempting the update command as often as `policy` allows.
pub fn update_tool<R: CommandRunner + ?Sized>(
    runner: &R,
    log: &RunLog,
    policy: &RetryPolicy,
    tool: &ToolSpec,
) -> anyhow::Result<UpdateResult> {
    log.section(&format!("Processing: {}", tool.label))?;

    let version_before = version_or_unknown(runner, log, tool.version_command)?;
    log.append(&format!("Before version: {}", version_before))?;

    let outcome = policy.run(
        |_| {
            log.append(&format!("Executing: {}", tool.update_command))?;
            Ok(command::run_checked(runner, tool.update_command, None))
        },
        |failed| {
            log.append(&format!(
                "{} update failed: {}",
                tool.label,
                failed.error.to_string().trim()
            ))?;
            if failed.will_retry {
                log.append(&format!(
                    "Retrying in {} seconds... (Attempt {}/{})",
                    policy.delay.as_secs(),
                    failed.attempt,
                    policy
                        .max_attempts
                        .map_or_else(|| "unlimited".to_string(), |max| max.to_string())
                ))?;
            }
            Ok(())
        },
    )?;

    match outcome {
        RetryOutcome::Succeeded { value, .. } => {
            log.append_output(&value.stdout)?;
            let version_after = version_or_unknown(runner, log, tool.version_command)?;
            log.append(&format!(
                "Update successful. After version: {}",
                version_after
            ))?;
            Ok(UpdateResult {
                succeeded: true,
                version_before,
                version_after,
            })
        }
        RetryOutcome::Exhausted { failures, .. } => {
            log.append(&format!(
                "{} update failed after {} attempts.",
                tool.label, failures
            ))?;
            Ok(UpdateResult {
                succeeded: false,
                version_after: version_before.clone(),
                version_before,
            })
        }
    }
}
