use std::time::Duration;

use clap::{
    builder::{NonEmptyStringValueParser, TypedValueParser},
    Args, Parser, Subcommand,
};
use secrecy::SecretString;

use crate::constants::{
    DEFAULT_GITHUB_API_URL, DEFAULT_MAX_ATTEMPTS, DEFAULT_STATUS_URL, DEFAULT_TRIGGER_URL,
};

/// Trigger a regression test run and mirror its progress into a pull request.
///
/// Every option can also be passed through the environment variable named next to it,
/// so a CI step usually needs no arguments at all.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub(crate) command: Option<Commands>,
    #[command(flatten)]
    pub(crate) auth: Auth,
    #[command(flatten)]
    pub(crate) pr: PullRequestArgs,
    #[command(flatten)]
    pub(crate) service: ServiceArgs,
    #[command(flatten)]
    pub(crate) check: CheckArgs,
    /// Log debug output from this tool
    #[arg(long, short, global = true)]
    pub(crate) verbose: bool,
}

#[derive(Subcommand, Debug)]
pub(crate) enum Commands {
    /// Handle a `/confirm-regression <test_id>` command from a PR comment
    Confirm(ConfirmArgs),
}

#[derive(Args, Debug)]
pub(crate) struct Auth {
    /// GitHub token used for comments and check runs
    #[arg(long, env, hide_env_values = true, value_parser = secret())]
    pub(crate) github_token: SecretString,
    /// GitHub REST API base URL
    #[arg(long, env, default_value = DEFAULT_GITHUB_API_URL)]
    pub(crate) github_api_url: String,
}

#[derive(Args, Debug)]
pub(crate) struct PullRequestArgs {
    /// Owner of the repository the pull request lives in
    #[arg(long, env, value_parser = NonEmptyStringValueParser::new())]
    pub(crate) repo_owner: String,
    /// Name of the repository the pull request lives in
    #[arg(long, env, value_parser = NonEmptyStringValueParser::new())]
    pub(crate) repo_name: String,
    /// Pull request number
    #[arg(long, env)]
    pub(crate) pr_number: u64,
    /// Commit to attach check runs to (default: head of the pull request)
    #[arg(long, env, value_parser = NonEmptyStringValueParser::new())]
    pub(crate) commit_sha: Option<String>,
}

#[derive(Args, Debug)]
pub(crate) struct ServiceArgs {
    /// API key of the regression test service
    #[arg(long, env, hide_env_values = true, value_parser = secret())]
    pub(crate) api_key: Option<SecretString>,
    /// Legacy name for `--api-key`
    #[arg(long, env, hide = true, value_parser = secret())]
    pub(crate) third_party_api_key: Option<SecretString>,
    /// Webhook that starts a regression test run
    #[arg(long, env, default_value = DEFAULT_TRIGGER_URL)]
    pub(crate) trigger_url: String,
    /// Base URL of the check status endpoint
    #[arg(long, env, default_value = DEFAULT_STATUS_URL)]
    pub(crate) status_url: String,
    /// Timeout for a single request to the service, in seconds
    #[arg(long, env, default_value_t = 30)]
    pub(crate) http_timeout: u64,
}

/// Non-empty secret that stays redacted in `Debug` output.
fn secret() -> impl TypedValueParser<Value = SecretString> {
    NonEmptyStringValueParser::new().map(SecretString::new)
}

impl ServiceArgs {
    pub(crate) fn api_key(&self) -> Option<&SecretString> {
        self.api_key.as_ref().or(self.third_party_api_key.as_ref())
    }

    pub(crate) fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout)
    }
}

#[derive(Args, Debug)]
pub(crate) struct CheckArgs {
    /// Test identifier (default: derived from repository name and PR number)
    #[arg(long, env, value_parser = NonEmptyStringValueParser::new())]
    pub(crate) test_id: Option<String>,
    /// POST to the trigger webhook before polling
    #[arg(long, env)]
    pub(crate) trigger: bool,
    /// Number of polls before giving up
    #[arg(long, env, default_value_t = DEFAULT_MAX_ATTEMPTS)]
    pub(crate) max_attempts: u32,
    /// Seconds to wait between polls
    #[arg(long, env, default_value_t = 5)]
    pub(crate) poll_interval: u64,
    /// Do not create a GitHub check run
    #[arg(long, env, global = true)]
    pub(crate) skip_check_run: bool,
}

impl CheckArgs {
    pub(crate) fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval)
    }
}

#[derive(Args, Debug)]
pub(crate) struct ConfirmArgs {
    /// Body of the PR comment that contains the command
    #[arg(long, env, default_value = "")]
    pub(crate) comment_body: String,
}
