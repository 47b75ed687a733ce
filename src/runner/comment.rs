use askama::Template;
use chrono::{DateTime, Utc};
use octocrab::Octocrab;
use tracing::Instrument;

use crate::constants::{is_status_comment, STATUS_COMMENT_MARKER};
use crate::error::Result;
use crate::octocrab_utils::PageExt;
use crate::pull_request::PullRequestRef;
use crate::service::{Check, StatusReport};
use crate::traits::StatusPublisher;

use super::Phase;

/// Keeps the single status comment of a pull request up to date.
pub(crate) struct CommentPublisher<'a> {
    github: &'a Octocrab,
    pr: &'a PullRequestRef,
}

impl<'a> CommentPublisher<'a> {
    pub(crate) fn new(github: &'a Octocrab, pr: &'a PullRequestRef) -> Self {
        Self { github, pr }
    }
}

impl StatusPublisher for CommentPublisher<'_> {
    async fn publish(&self, phase: Phase, test_id: &str, report: &StatusReport) -> Result<()> {
        let markdown = make(phase, test_id, &report.checks, Utc::now())?;
        update(self.github, self.pr, markdown)
            .instrument(tracing::info_span!("comment_update"))
            .await
    }
}

/// Edit the status comment of `pr`, or create it if there is none.
pub(crate) async fn update(
    github: &Octocrab,
    pr: &PullRequestRef,
    markdown: String,
) -> Result<()> {
    tracing::debug!("Updating status comment for {pr}");
    let issue_api = github.issues(&pr.owner, &pr.repo);
    if let Some(comment) = issue_api
        .list_comments(pr.number)
        .send()
        .await?
        .find(github, is_status_comment)
        .await?
    {
        issue_api.update_comment(comment.id, markdown).await?;
        tracing::info!("Updated comment at {}", comment.html_url);
    } else {
        let comment = issue_api.create_comment(pr.number, markdown).await?;
        tracing::info!("Created comment at {}", comment.html_url);
    }
    Ok(())
}

#[derive(Template)]
#[template(path = "comment.md.j2", escape = "none")]
struct Comment<'a> {
    marker: &'a str,
    phase: Phase,
    test_id: &'a str,
    checks: &'a [Check],
    now: DateTime<Utc>,
}

fn make(phase: Phase, test_id: &str, checks: &[Check], now: DateTime<Utc>) -> Result<String> {
    Ok(Comment {
        marker: STATUS_COMMENT_MARKER,
        phase,
        test_id,
        checks,
        now,
    }
    .render()?)
}
