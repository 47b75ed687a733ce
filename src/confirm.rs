//! Handles `/confirm-regression <test_id>` comments: re-checks the test once and records
//! the verdict as a check run and a PR comment.

use std::sync::LazyLock;

use octocrab::{params::checks::CheckRunConclusion, Octocrab};
use regex::Regex;

use crate::cli::ConfirmArgs;
use crate::constants::CONFIRM_COMMAND;
use crate::error::{Error, Result};
use crate::pull_request::PullRequestRef;
use crate::runner::{checks, comment::CommentPublisher, Phase};
use crate::service::{RegressionService, StatusReport};
use crate::traits::StatusPublisher;

static COMMAND: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"{}\s+(\w+)", regex::escape(CONFIRM_COMMAND))).expect("valid regex")
});

/// Extract the test id from the first confirmation command in `body`.
pub(crate) fn parse_command(body: &str) -> Option<&str> {
    COMMAND
        .captures(body)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

/// Handle a confirmation comment. Failures to reach GitHub or the service are also reported
/// back to the PR, as far as GitHub still accepts comments.
pub(crate) async fn handle(
    github: &Octocrab,
    service: &RegressionService,
    pr: &PullRequestRef,
    args: &ConfirmArgs,
    skip_check_run: bool,
) -> Result<()> {
    let res = confirm(github, service, pr, args, skip_check_run).await;
    if let Err(e) = &res {
        if matches!(e, Error::GitHub(_) | Error::Service(_) | Error::Render(_)) {
            let body = format!("❌ Failed to process confirmation: {}", e.chain());
            if let Err(post) = github
                .issues(&pr.owner, &pr.repo)
                .create_comment(pr.number, body)
                .await
            {
                tracing::warn!("Could not report the failure on {pr}: {post}");
            }
        }
    }
    res
}

async fn confirm(
    github: &Octocrab,
    service: &RegressionService,
    pr: &PullRequestRef,
    args: &ConfirmArgs,
    skip_check_run: bool,
) -> Result<()> {
    let issues = github.issues(&pr.owner, &pr.repo);
    let Some(test_id) = parse_command(&args.comment_body) else {
        tracing::warn!("No confirmation command in comment on {pr}");
        issues.create_comment(pr.number, usage()).await?;
        return Err(Error::InvalidCommand);
    };

    tracing::info!("Re-checking regression test {test_id} for {pr}");
    let report = service.poll(test_id).await;

    if !skip_check_run {
        let head_sha = pr.head_sha(github).await?;
        let (title, summary) = if report.all_checked {
            ("Regression test passed", "All checks passed after confirmation.")
        } else {
            ("Regression test still failing", "Checks still failing after confirmation.")
        };
        let conclusion = if report.all_checked {
            CheckRunConclusion::Success
        } else {
            CheckRunConclusion::Failure
        };
        let output = checks::output(title, summary.to_owned(), checks::checklist(&report));
        let checks_api = github.checks(&pr.owner, &pr.repo);
        let check_id = checks::complete(&checks_api, &head_sha, conclusion, output).await?;
        tracing::info!("Recorded verdict as check run {check_id}");
    }

    if report.all_checked {
        CommentPublisher::new(github, pr)
            .publish(Phase::Passed, test_id, &report)
            .await?;
    }
    issues.create_comment(pr.number, verdict(test_id, &report)).await?;

    if report.all_checked {
        Ok(())
    } else {
        Err(Error::Failed {
            test_id: test_id.to_owned(),
            pending: report.pending(),
        })
    }
}

fn usage() -> String {
    format!("❌ Invalid confirmation format, please use `{CONFIRM_COMMAND} <test_id>`")
}

fn verdict(test_id: &str, report: &StatusReport) -> String {
    if report.all_checked {
        return format!("✅ Regression test confirmed as passed\n\nTest ID: `{test_id}`");
    }
    let details = checks::checklist(report).unwrap_or_else(|| "_No checks reported._".to_owned());
    format!("❌ Regression test still not passing\n\nTest ID: `{test_id}`\n\n{details}")
}
