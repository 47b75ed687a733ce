use octocrab::Octocrab;
use secrecy::SecretString;
use serde_json::{json, Value};
use wiremock::{
    matchers::{header, method, path},
    Mock, MockServer, ResponseTemplate,
};

use crate::cli::ServiceArgs;
use crate::pull_request::PullRequestRef;
use crate::service::{Check, RegressionService};

pub(crate) const API_KEY: &str = "It's a Secret to Everybody";
pub(crate) const OWNER: &str = "datarecce";
pub(crate) const REPO: &str = "jaffle_shop";
pub(crate) const PR_NUMBER: u64 = 6;
pub(crate) const HEAD_SHA: &str = "f88f7bd4250b963752d615e491b7e676ce5eb7f0";

pub(crate) fn pull_request() -> PullRequestRef {
    PullRequestRef {
        owner: OWNER.to_owned(),
        repo: REPO.to_owned(),
        number: PR_NUMBER,
        commit_sha: Some(HEAD_SHA.to_owned()),
    }
}

pub(crate) fn service_args(mock_server: &MockServer) -> ServiceArgs {
    ServiceArgs {
        api_key: Some(SecretString::new(API_KEY.to_owned())),
        third_party_api_key: None,
        trigger_url: format!("{}/datarecce/webhooks/recce_check", mock_server.uri()),
        status_url: format!("{}/recce/", mock_server.uri()),
        http_timeout: 5,
    }
}

pub(crate) fn service(mock_server: &MockServer) -> RegressionService {
    RegressionService::new(&service_args(mock_server)).unwrap()
}

pub(crate) fn github(mock_server: &MockServer) -> Octocrab {
    // https://github.com/flows-network/octocrab/blob/main/examples/custom_client.rs
    Octocrab::builder()
        .base_uri(mock_server.uri())
        .unwrap()
        .build()
        .unwrap()
}

pub(crate) fn check(name: &str, is_checked: bool) -> Check {
    Check {
        name: name.to_owned(),
        is_checked,
    }
}

/// Answer the checks endpoint of `test_id` with `checks`.
pub(crate) fn checks_mock(test_id: &str, checks: &[Check]) -> Mock {
    Mock::given(method("GET"))
        .and(path(format!("/recce/{test_id}/api/checks")))
        .and(header("api-key", API_KEY))
        .respond_with(ResponseTemplate::new(200).set_body_json(checks))
}

pub(crate) fn user_json(login: &str) -> Value {
    let api = format!("https://api.github.com/users/{login}");
    json!({
        "login": login,
        "id": 41_898_282_u64,
        "node_id": "MDM6Qm90NDE4OTgyODI=",
        "avatar_url": "https://avatars.githubusercontent.com/in/15368?v=4",
        "gravatar_id": "",
        "url": api,
        "html_url": format!("https://github.com/apps/{login}"),
        "followers_url": format!("{api}/followers"),
        "following_url": format!("{api}/following{{/other_user}}"),
        "gists_url": format!("{api}/gists{{/gist_id}}"),
        "starred_url": format!("{api}/starred{{/owner}}{{/repo}}"),
        "subscriptions_url": format!("{api}/subscriptions"),
        "organizations_url": format!("{api}/orgs"),
        "repos_url": format!("{api}/repos"),
        "events_url": format!("{api}/events{{/privacy}}"),
        "received_events_url": format!("{api}/received_events"),
        "type": "Bot",
        "site_admin": false,
    })
}

/// An issue comment as returned by the GitHub REST API.
pub(crate) fn comment_json(id: u64, body: &str) -> Value {
    let repo_api = format!("https://api.github.com/repos/{OWNER}/{REPO}");
    json!({
        "id": id,
        "node_id": "IC_kwDOLEm4Gc5x1vAZ",
        "url": format!("{repo_api}/issues/comments/{id}"),
        "html_url": format!("https://github.com/{OWNER}/{REPO}/pull/{PR_NUMBER}#issuecomment-{id}"),
        "issue_url": format!("{repo_api}/issues/{PR_NUMBER}"),
        "body": body,
        "user": user_json("github-actions[bot]"),
        "created_at": "2024-03-01T12:00:00Z",
        "updated_at": "2024-03-01T12:00:00Z",
        "author_association": "NONE",
        "performed_via_github_app": null,
    })
}

/// A check run as returned by the GitHub REST API.
pub(crate) fn check_run_json(id: u64, status: &str, conclusion: Option<&str>) -> Value {
    let repo_api = format!("https://api.github.com/repos/{OWNER}/{REPO}");
    json!({
        "id": id,
        "node_id": "CR_kwDOLEm4Gc8AAAAF",
        "head_sha": HEAD_SHA,
        "external_id": "",
        "url": format!("{repo_api}/check-runs/{id}"),
        "html_url": format!("https://github.com/{OWNER}/{REPO}/runs/{id}"),
        "details_url": format!("https://github.com/{OWNER}/{REPO}/runs/{id}"),
        "status": status,
        "conclusion": conclusion,
        "started_at": "2024-03-01T12:00:00Z",
        "completed_at": conclusion.map(|_| "2024-03-01T12:10:00Z"),
        "output": {
            "title": "Regression test",
            "summary": "",
            "text": null,
            "annotations_count": 0,
            "annotations_url": format!("{repo_api}/check-runs/{id}/annotations"),
        },
        "name": "Regression Test",
        "check_suite": { "id": 5 },
        "pull_requests": [],
    })
}

fn branch_json(label: &str, git_ref: &str, sha: &str) -> Value {
    json!({
        "label": label,
        "ref": git_ref,
        "sha": sha,
        "user": user_json(OWNER),
    })
}

/// A pull request as returned by the GitHub REST API, with the given head commit.
pub(crate) fn pull_request_json(head_sha: &str) -> Value {
    let repo_api = format!("https://api.github.com/repos/{OWNER}/{REPO}");
    json!({
        "url": format!("{repo_api}/pulls/{PR_NUMBER}"),
        "id": 1_734_289_547_u64,
        "node_id": "PR_kwDOLEm4Gc5nXxGL",
        "html_url": format!("https://github.com/{OWNER}/{REPO}/pull/{PR_NUMBER}"),
        "diff_url": format!("https://github.com/{OWNER}/{REPO}/pull/{PR_NUMBER}.diff"),
        "patch_url": format!("https://github.com/{OWNER}/{REPO}/pull/{PR_NUMBER}.patch"),
        "issue_url": format!("{repo_api}/issues/{PR_NUMBER}"),
        "commits_url": format!("{repo_api}/pulls/{PR_NUMBER}/commits"),
        "review_comments_url": format!("{repo_api}/pulls/{PR_NUMBER}/comments"),
        "review_comment_url": format!("{repo_api}/pulls/comments{{/number}}"),
        "comments_url": format!("{repo_api}/issues/{PR_NUMBER}/comments"),
        "statuses_url": format!("{repo_api}/statuses/{head_sha}"),
        "number": PR_NUMBER,
        "state": "open",
        "locked": false,
        "title": "Add row count model",
        "user": user_json(OWNER),
        "body": null,
        "labels": [],
        "created_at": "2024-03-01T11:00:00Z",
        "updated_at": "2024-03-01T11:30:00Z",
        "closed_at": null,
        "merged_at": null,
        "merge_commit_sha": null,
        "assignees": [],
        "requested_reviewers": [],
        "requested_teams": [],
        "head": branch_json(&format!("{OWNER}:feature"), "feature", head_sha),
        "base": branch_json(&format!("{OWNER}:main"), "main", "a4786471ee4d4e894fec150e426c3551db0f31e0"),
        "author_association": "OWNER",
        "draft": false,
    })
}
