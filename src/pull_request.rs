use std::fmt::Display;

use octocrab::Octocrab;

use crate::cli::PullRequestArgs;
use crate::error::Result;

/// The pull request a regression test run reports into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PullRequestRef {
    pub owner: String,
    pub repo: String,
    pub number: u64,
    /// Commit given on the command line; looked up from the PR head if absent.
    pub commit_sha: Option<String>,
}

impl From<PullRequestArgs> for PullRequestRef {
    fn from(args: PullRequestArgs) -> Self {
        Self {
            owner: args.repo_owner,
            repo: args.repo_name,
            number: args.pr_number,
            commit_sha: args.commit_sha,
        }
    }
}

impl PullRequestRef {
    pub(crate) async fn head_sha(&self, github: &Octocrab) -> Result<String> {
        if let Some(sha) = &self.commit_sha {
            return Ok(sha.clone());
        }
        let pr = github.pulls(&self.owner, &self.repo).get(self.number).await?;
        tracing::debug!("Resolved head of {self} to {}", pr.head.sha);
        Ok(pr.head.sha)
    }

    /// Stable identifier of the regression test resource belonging to this PR.
    pub(crate) fn derived_test_id(&self) -> String {
        let digest = hmac_sha256::Hash::hash(format!("{}#{}", self.repo, self.number).as_bytes());
        hex::encode(&digest[..16])
    }
}

impl Display for PullRequestRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}#{}", self.owner, self.repo, self.number)
    }
}
