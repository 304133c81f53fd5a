//! Application-wide constants.
//!
//! Centralized configuration values to avoid magic numbers throughout the codebase.

use std::path::PathBuf;
use std::time::Duration;

/// Default delay between attempts of a failing command (in seconds).
const DEFAULT_RETRY_DELAY_SECS: u64 = 5;

/// Returns the delay between attempts of a failing update command.
///
/// Can be customized via the DAILY_UPDATERS_RETRY_DELAY_SECS environment variable.
/// Falls back to 5 seconds if not set or invalid.
pub fn retry_delay() -> Duration {
    std::env::var("DAILY_UPDATERS_RETRY_DELAY_SECS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_secs)
        .unwrap_or(Duration::from_secs(DEFAULT_RETRY_DELAY_SECS))
}

/// Returns the attempt bound for the repository updater.
///
/// Read from GIT_REPOSITORIES_UPDATE_MAX_ATTEMPTS. `None` (unset, zero or not a number)
/// keeps retrying a repository until its pull succeeds.
///
/// Example: `GIT_REPOSITORIES_UPDATE_MAX_ATTEMPTS=20 git-repositories-update`
pub fn repository_max_attempts() -> Option<u32> {
    std::env::var("GIT_REPOSITORIES_UPDATE_MAX_ATTEMPTS")
        .ok()
        .and_then(|s| parse_max_attempts(&s))
}

fn parse_max_attempts(value: &str) -> Option<u32> {
    value.trim().parse::<u32>().ok().filter(|n| *n > 0)
}

/// Maximum number of update attempts per package manager.
pub const PACKAGE_MANAGER_MAX_ATTEMPTS: u32 = 3;

/// Git directory name used to detect repositories.
pub const GIT_DIR: &str = ".git";

/// Command run inside every listed repository.
pub const PULL_COMMAND: &str = "git pull";

/// Version string recorded when a version query fails.
pub const UNKNOWN_VERSION: &str = "Unknown";

pub const REPOSITORY_LIST_FILE: &str = "repositories.txt";
pub const REPOSITORY_LOG_FILE: &str = "git-repositories-update.log";
pub const PACKAGE_MANAGER_LOG_FILE: &str = "nodejs-package-managers-update.log";

/// Returns the repository list location.
///
/// GIT_REPOSITORIES_UPDATE_LIST overrides the default `repositories.txt`
/// next to the running executable.
pub fn repository_list_path() -> PathBuf {
    std::env::var_os("GIT_REPOSITORIES_UPDATE_LIST")
        .map(PathBuf::from)
        .unwrap_or_else(|| install_dir().join(REPOSITORY_LIST_FILE))
}

/// Returns where a log file named `file_name` is written.
///
/// DAILY_UPDATERS_LOG_DIR overrides the directory; otherwise logs sit next to the executable.
pub fn log_path(file_name: &str) -> PathBuf {
    std::env::var_os("DAILY_UPDATERS_LOG_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(install_dir)
        .join(file_name)
}

fn install_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("."))
}
