mod octocrab_utils;
mod parser;
mod tracing;

pub(crate) use octocrab_utils::github_client;
pub(crate) use parser::{
    Auth, CheckArgs, Cli, Commands, ConfirmArgs, PullRequestArgs, ServiceArgs,
};
pub(crate) use tracing::init as init_tracing;
