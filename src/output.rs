//! Console messages.
//!
//! Progress goes to the log file; the console only sees the completion line
//! and the fatal configuration messages.

use crate::error::UpdateError;
use colored::Colorize;
use std::path::Path;

/// Printed by the repository updater after its summary is logged.
pub fn print_repositories_done(log_path: &Path) {
    println!("{}", completion_line("All repositories processed.", log_path));
}

/// Printed by the package-manager updater after its summary is logged.
pub fn print_updates_done(log_path: &Path) {
    println!("{}", completion_line("All updates processed.", log_path));
}

fn completion_line(what: &str, log_path: &Path) -> String {
    format!(
        "{} {}",
        format!("{} Log saved to:", what).green(),
        log_path.display().to_string().white().bold()
    )
}

/// Prints the guidance for a configuration error that ends the run.
pub fn print_fatal(error: &UpdateError) {
    eprintln!("{}", error.to_string().red().bold());
    if let Some(hint) = fatal_hint(error) {
        eprintln!("{}", hint.yellow());
    }
}

fn fatal_hint(error: &UpdateError) -> Option<&'static str> {
    match error {
        UpdateError::ConfigMissing { .. } => {
            Some("Please create it with one repository path per line.")
        }
        _ => None,
    }
}

pub fn print_error(error: &anyhow::Error) {
    eprintln!("{} {:#}", "error:".red().bold(), error);
}
