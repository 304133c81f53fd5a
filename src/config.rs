//! Configuration types for CLI verbosity and options.

use crate::log::{self, LogEcho};
use clap::Parser;

/// Command-line flags shared by both updaters.
#[derive(Debug, Parser)]
#[command(version, about)]
pub struct Cli {
    /// Echo every log line to stderr while running
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    #[must_use]
    pub fn config(&self) -> Config {
        let verbosity = if self.verbose {
            Verbosity::Verbose
        } else {
            Verbosity::Normal
        };
        Config { verbosity }
    }
}

/// Runtime configuration derived from CLI arguments.
#[derive(Debug, Clone, Copy, Default)]
pub struct Config {
    /// Controls the verbosity level of CLI output.
    pub verbosity: Verbosity,
}

impl Config {
    #[must_use]
    pub fn is_verbose(&self) -> bool {
        self.verbosity == Verbosity::Verbose
    }

    /// Returns the console echo used by the run log.
    ///
    /// Config only picks the function; writing to the log file is the same in every mode.
    #[must_use]
    pub fn log_echo(&self) -> LogEcho {
        if self.is_verbose() {
            log::stderr_echo
        } else {
            log::no_echo
        }
    }
}

/// Verbosity level for CLI output.
///
/// Only the log echo depends on it; the completion line is always printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    #[default]
    Normal,
    Verbose,
}
