//! Error types shared by both updaters.
//!
//! - `ConfigMissing` / `ConfigEmpty`: fatal, the repository updater exits
//! - `CommandFailed`: recoverable, drives a retry
//! - `NotARepository`: recoverable, the path is skipped with a warning

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum UpdateError {
    /// Repository list file does not exist
    #[error("Repository list file not found: {}", path.display())]
    ConfigMissing { path: PathBuf },

    /// Repository list file has no usable entries
    #[error("No valid repository paths found in {}", path.display())]
    ConfigEmpty { path: PathBuf },

    /// Repository list file exists but could not be read
    #[error("failed to read repository list {}: {source}", path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// External command could not start, exited non-zero, or only wrote to stderr
    #[error("{message}")]
    CommandFailed { command: String, message: String },

    /// Path has no version-control metadata marker
    #[error("{} is not a valid Git repository.", path.display())]
    NotARepository { path: PathBuf },
}

impl UpdateError {
    pub fn command_failed(command: impl Into<String>, message: impl Into<String>) -> Self {
        UpdateError::CommandFailed {
            command: command.into(),
            message: message.into(),
        }
    }

    /// Returns true for the errors that stop the repository updater before any work starts.
    #[must_use]
    pub fn is_fatal_config(&self) -> bool {
        matches!(
            self,
            UpdateError::ConfigMissing { .. }
                | UpdateError::ConfigEmpty { .. }
                | UpdateError::ConfigRead { .. }
        )
    }
}
