//! Batch updaters for daily maintenance.
//!
//! This crate provides two sequential utilities:
//! - `git-repositories-update`: pulls every repository named in a list file,
//!   retrying a failing pull until it succeeds (or an optional bound is hit)
//! - `package-managers-update`: updates npm, Yarn and pnpm with a capped number
//!   of attempts, recording versions before and after
//!
//! Both append timestamped progress to their own log file.

pub mod command;
pub mod config;
pub mod constants;
pub mod error;
pub mod log;
pub mod output;
pub mod package_manager;
pub mod repo;
pub mod repo_list;
pub mod retry;
