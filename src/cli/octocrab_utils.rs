use anyhow::{Context, Result};
use secrecy::ExposeSecret;

use super::Auth;

/// Build an authenticated client for the configured GitHub API.
pub(crate) fn github_client(auth: Auth) -> Result<octocrab::Octocrab> {
    let Auth {
        github_token,
        github_api_url,
    } = auth;
    octocrab::Octocrab::builder()
        .base_uri(github_api_url.as_str())
        .with_context(|| format!("invalid GitHub API URL {github_api_url:?}"))?
        // https://github.com/XAMPPRocky/octocrab/issues/594
        .personal_token(github_token.expose_secret().to_owned())
        .build()
        .context("failed to build GitHub client")
}
