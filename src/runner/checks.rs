use std::future::Future;

use octocrab::{
    checks::ChecksHandler,
    models::CheckRunId,
    params::checks::{CheckRunConclusion, CheckRunOutput, CheckRunStatus},
};

use crate::constants::{CHECK_RUN_NAME, CHECK_RUN_TEXT_LIMIT};
use crate::error::Result;
use crate::octocrab_utils::clamp_text;
use crate::service::StatusReport;
use crate::utils::PipeMap;

use super::{Outcome, Phase};

/// Run `func` inside a check run on `head_sha`, completing it according to the outcome.
pub(crate) async fn with_check<Fut>(
    checks: ChecksHandler<'_>,
    head_sha: &str,
    test_id: &str,
    func: impl FnOnce() -> Fut,
) -> Result<Outcome>
where
    Fut: Future<Output = Result<Outcome>>,
{
    let check_id = start(&checks, head_sha, test_id).await?;
    let res = func().await;
    let (conclusion, output) = match &res {
        Ok(outcome) => conclude(test_id, outcome),
        Err(e) => (
            CheckRunConclusion::Failure,
            output(
                "Regression test errored",
                format!("Polling regression test `{test_id}` failed."),
                Some(format!("## Error message\n{}", e.chain())),
            ),
        ),
    };
    checks
        .update_check_run(check_id)
        .status(CheckRunStatus::Completed)
        .conclusion(conclusion)
        .output(output)
        .send()
        .await?;
    res
}

async fn start(checks: &ChecksHandler<'_>, head_sha: &str, test_id: &str) -> Result<CheckRunId> {
    let run = checks
        .create_check_run(CHECK_RUN_NAME, head_sha)
        .status(CheckRunStatus::InProgress)
        .output(output(
            "Regression test in progress",
            format!("Waiting for regression test `{test_id}`…"),
            None,
        ))
        .send()
        .await?;
    tracing::info!("Started check run {} on {head_sha}", run.id);
    Ok(run.id)
}

/// Create an already completed check run.
pub(crate) async fn complete(
    checks: &ChecksHandler<'_>,
    head_sha: &str,
    conclusion: CheckRunConclusion,
    output: CheckRunOutput,
) -> Result<CheckRunId> {
    let run = checks
        .create_check_run(CHECK_RUN_NAME, head_sha)
        .status(CheckRunStatus::Completed)
        .conclusion(conclusion)
        .output(output)
        .send()
        .await?;
    Ok(run.id)
}

fn conclude(test_id: &str, outcome: &Outcome) -> (CheckRunConclusion, CheckRunOutput) {
    let text = checklist(&outcome.report);
    match outcome.phase {
        Phase::Passed => (
            CheckRunConclusion::Success,
            output(
                "Regression test passed",
                format!("All checks of `{test_id}` passed."),
                text,
            ),
        ),
        Phase::Polling | Phase::TimedOut => (
            CheckRunConclusion::Failure,
            output(
                "Regression test timed out",
                format!(
                    "Checks of `{test_id}` did not pass within {} polls. \
                     Once they pass, comment `/confirm-regression {test_id}` to re-check.",
                    outcome.polls
                ),
                text,
            ),
        ),
    }
}

/// Markdown checklist of `report`, `None` if it is empty.
pub(crate) fn checklist(report: &StatusReport) -> Option<String> {
    (!report.checks.is_empty()).then(|| {
        report
            .checks
            .iter()
            .map(|c| format!("- {} {}\n", c.icon(), c.name))
            .collect()
    })
}

pub(crate) fn output(title: &str, summary: String, text: Option<String>) -> CheckRunOutput {
    CheckRunOutput {
        title: title.to_owned(),
        summary,
        text: None,
        annotations: vec![],
        images: vec![],
    }
    .pipe_map(text, |mut output, text| {
        output.text = Some(clamp_text(&text, CHECK_RUN_TEXT_LIMIT).to_owned());
        output
    })
}
