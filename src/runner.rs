use std::time::Duration;

use octocrab::Octocrab;
use tracing::Instrument;

use crate::cli::CheckArgs;
use crate::error::{Error, Result};
use crate::pull_request::PullRequestRef;
use crate::service::{RegressionService, StatusReport, TriggerPayload};
use crate::traits::StatusPublisher;

pub(crate) mod checks;
pub(crate) mod comment;

/// State of the poll loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Phase {
    Polling,
    Passed,
    TimedOut,
}

impl Phase {
    pub(crate) fn icon(self) -> &'static str {
        match self {
            Phase::Polling => "🔄",
            Phase::Passed => "✅",
            Phase::TimedOut => "⏰",
        }
    }

    pub(crate) fn summary(self) -> &'static str {
        match self {
            Phase::Polling => "Waiting for all checks to pass…",
            Phase::Passed => "All checks completed!",
            Phase::TimedOut => "Timed out waiting for checks to pass.",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct PollSettings {
    pub max_attempts: u32,
    pub interval: Duration,
}

impl PollSettings {
    /// Polls issued by a loop that runs out of attempts: one per attempt plus a final one.
    pub(crate) fn total_polls(self) -> u32 {
        self.max_attempts.saturating_add(1)
    }
}

impl From<&CheckArgs> for PollSettings {
    fn from(args: &CheckArgs) -> Self {
        Self {
            max_attempts: args.max_attempts,
            interval: args.poll_interval(),
        }
    }
}

/// How a poll loop ended. `phase` is never [`Phase::Polling`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Outcome {
    pub phase: Phase,
    /// Number of polls issued, including the one after the last attempt.
    pub polls: u32,
    pub report: StatusReport,
}

impl Outcome {
    pub(crate) fn into_result(self, test_id: &str) -> Result<()> {
        match self.phase {
            Phase::Passed => Ok(()),
            Phase::Polling | Phase::TimedOut => Err(Error::Timeout {
                test_id: test_id.to_owned(),
                attempts: self.polls,
            }),
        }
    }
}

/// Poll `test_id` until every check passes or the attempts run out.
pub(crate) async fn poll_loop<P: StatusPublisher>(
    service: &RegressionService,
    publisher: &P,
    test_id: &str,
    settings: PollSettings,
) -> Result<Outcome> {
    for attempt in 1..=settings.max_attempts {
        let report = service.poll(test_id).await;
        if report.all_checked {
            tracing::info!("All {} checks passed after {attempt} polls", report.checks.len());
            publisher.publish(Phase::Passed, test_id, &report).await?;
            return Ok(Outcome {
                phase: Phase::Passed,
                polls: attempt,
                report,
            });
        }
        tracing::info!(
            "Poll {attempt}/{}: {}/{} checks passed",
            settings.max_attempts,
            report.passed_count(),
            report.checks.len(),
        );
        // a lost intermediate update is repaired by the next one
        if let Err(e) = publisher.publish(Phase::Polling, test_id, &report).await {
            tracing::warn!("Failed to update status comment: {}", e.chain());
        }
        tokio::time::sleep(settings.interval).await;
    }

    let report = service.poll(test_id).await;
    let phase = if report.all_checked {
        Phase::Passed
    } else {
        tracing::warn!(
            "Gave up on {test_id} after {} polls, pending: {:?}",
            settings.max_attempts,
            report.pending()
        );
        Phase::TimedOut
    };
    publisher.publish(phase, test_id, &report).await?;
    Ok(Outcome {
        phase,
        polls: settings.total_polls(),
        report,
    })
}

/// Trigger (if asked to), poll and report a regression test for `pr`.
pub(crate) async fn run(
    github: &Octocrab,
    service: &RegressionService,
    pr: &PullRequestRef,
    args: &CheckArgs,
) -> Result<()> {
    let head_sha = if args.trigger || !args.skip_check_run {
        Some(pr.head_sha(github).await?)
    } else {
        None
    };

    let triggered_id = match (&head_sha, args.trigger) {
        (Some(commit_sha), true) => {
            let payload = TriggerPayload {
                repo_owner: &pr.owner,
                repo_name: &pr.repo,
                commit_sha,
                pr_number: pr.number,
            };
            service.trigger(&payload).await?
        }
        _ => None,
    };
    let test_id = resolve_test_id(args.test_id.as_deref(), triggered_id, pr);
    tracing::info!("Tracking regression test {test_id} for {pr}");

    let publisher = comment::CommentPublisher::new(github, pr);
    let settings = PollSettings::from(args);
    let poll = || {
        poll_loop(service, &publisher, &test_id, settings)
            .instrument(tracing::info_span!("poll_loop", test_id = %test_id))
    };
    let outcome = match head_sha.filter(|_| !args.skip_check_run) {
        Some(head_sha) => {
            let checks = github.checks(&pr.owner, &pr.repo);
            checks::with_check(checks, &head_sha, &test_id, poll).await?
        }
        None => poll().await?,
    };
    outcome.into_result(&test_id)
}

/// An explicit id wins over one handed out by the trigger, which wins over the derived one.
fn resolve_test_id(
    explicit: Option<&str>,
    triggered: Option<String>,
    pr: &PullRequestRef,
) -> String {
    explicit
        .map(str::to_owned)
        .or(triggered)
        .unwrap_or_else(|| pr.derived_test_id())
}
