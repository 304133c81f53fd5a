use clap::Parser;
use daily_updaters::command::ShellRunner;
use daily_updaters::config::{Cli, Config};
use daily_updaters::log::RunLog;
use daily_updaters::package_manager::{self, TOOLS};
use daily_updaters::retry::RetryPolicy;
use daily_updaters::{constants, output};
use std::process::ExitCode;

fn main() -> ExitCode {
    let config = Cli::parse().config();
    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            output::print_error(&err);
            ExitCode::FAILURE
        }
    }
}

fn run(config: &Config) -> anyhow::Result<()> {
    let log = RunLog::new(
        constants::log_path(constants::PACKAGE_MANAGER_LOG_FILE),
        config.log_echo(),
    );
    let policy = RetryPolicy::capped(
        constants::PACKAGE_MANAGER_MAX_ATTEMPTS,
        constants::retry_delay(),
    );

    package_manager::update_package_managers(&ShellRunner, &log, &policy, &TOOLS)?;

    output::print_updates_done(log.path());
    Ok(())
}
