#![warn(clippy::pedantic)]

use std::process::ExitCode;

use clap::Parser;

use crate::error::{Error, Result};
use crate::pull_request::PullRequestRef;
use crate::service::RegressionService;

mod cli;
mod confirm;
mod constants;
mod error;
#[cfg(test)]
mod fixtures;
mod octocrab_utils;
mod pull_request;
mod runner;
mod service;
mod traits;
mod utils;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = cli::Cli::parse();
    cli::init_tracing(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            tracing::error!("{}", error.chain());
            error.exit_code()
        }
    }
}

async fn run(cli: cli::Cli) -> Result<()> {
    let cli::Cli {
        command,
        auth,
        pr,
        service,
        check,
        verbose: _,
    } = cli;
    let github = cli::github_client(auth).map_err(Error::config)?;
    let service = RegressionService::new(&service)?;
    let pr = PullRequestRef::from(pr);

    match command {
        None => runner::run(&github, &service, &pr, &check).await,
        Some(cli::Commands::Confirm(args)) => {
            confirm::handle(&github, &service, &pr, &args, check.skip_check_run).await
        }
    }
}
