use clap::Parser;
use daily_updaters::command::ShellRunner;
use daily_updaters::config::{Cli, Config};
use daily_updaters::error::UpdateError;
use daily_updaters::log::RunLog;
use daily_updaters::retry::RetryPolicy;
use daily_updaters::{constants, output, repo, repo_list};
use std::process::ExitCode;

fn main() -> ExitCode {
    let config = Cli::parse().config();
    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            match err.downcast_ref::<UpdateError>() {
                Some(update_err) if update_err.is_fatal_config() => output::print_fatal(update_err),
                _ => output::print_error(&err),
            }
            ExitCode::FAILURE
        }
    }
}

fn run(config: &Config) -> anyhow::Result<()> {
    let list_path = constants::repository_list_path();
    let entries = repo_list::load_repository_list(&list_path)?;
    let repos = repo_list::require_entries(entries, &list_path)?;

    let log = RunLog::new(
        constants::log_path(constants::REPOSITORY_LOG_FILE),
        config.log_echo(),
    );
    let policy = RetryPolicy {
        max_attempts: constants::repository_max_attempts(),
        delay: constants::retry_delay(),
    };

    repo::update_repositories(&ShellRunner, &log, &policy, &list_path, &repos)?;

    output::print_repositories_done(log.path());
    Ok(())
}
