//! Append-only run log.
//!
//! Each updater writes its progress to a plain text file, one
//! `[YYYY-MM-DD HH:MM:SS] <message>` line per event. The file is never read back.

use anyhow::Context;
use chrono::{DateTime, Utc};
use colored::Colorize;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Console echo invoked with every logged line (already timestamped).
pub type LogEcho = fn(&str);

pub const SEPARATOR: &str =
    "=====================================================================";
pub const SECTION_SEPARATOR: &str =
    "-------------------------------------------------------------";

pub fn stderr_echo(line: &str) {
    eprintln!("{}", line.dimmed());
}

pub fn no_echo(_line: &str) {}

/// Explicit logger constructed once per run and passed to every component.
#[derive(Debug, Clone)]
pub struct RunLog {
    path: PathBuf,
    echo: LogEcho,
}

impl RunLog {
    pub fn new(path: impl Into<PathBuf>, echo: LogEcho) -> Self {
        Self {
            path: path.into(),
            echo,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends one timestamped line and flushes it before returning.
    ///
    /// The file is opened for every call; no handle outlives the write.
    pub fn append(&self, message: &str) -> anyhow::Result<()> {
        let line = format_line(Utc::now(), message);
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("Failed to open log file {}", self.path.display()))?;
        writeln!(file, "{}", line)
            .and_then(|_| file.flush())
            .with_context(|| format!("Failed to write log file {}", self.path.display()))?;
        (self.echo)(&line);
        Ok(())
    }

    /// Logs captured command output the way it was printed, minus surrounding whitespace.
    pub fn append_output(&self, output: &str) -> anyhow::Result<()> {
        self.append(output.trim())
    }

    pub fn separator(&self) -> anyhow::Result<()> {
        self.append(SEPARATOR)
    }

    /// Writes a dashed block around `title`.
    pub fn section(&self, title: &str) -> anyhow::Result<()> {
        self.append(SECTION_SEPARATOR)?;
        self.append(title)?;
        self.append(SECTION_SEPARATOR)
    }

    /// Writes a `=` block around `title`.
    pub fn banner(&self, title: &str) -> anyhow::Result<()> {
        self.separator()?;
        self.append(title)?;
        self.separator()
    }
}

/// Formats a log line. Timestamps are UTC with second precision.
pub fn format_line(timestamp: DateTime<Utc>, message: &str) -> String {
    format!("[{}] {}", timestamp.format("%Y-%m-%d %H:%M:%S"), message)
}

/// Human-readable local time for run headers and footers.
pub fn local_time() -> String {
    chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}
