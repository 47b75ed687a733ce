//! Client for the external regression test service.
//!
//! The service exposes two endpoints: a webhook that starts a test run, and a
//! per-run list of named checks that flip to `is_checked` once they pass.

use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::cli::ServiceArgs;
use crate::error::{Error, Result};

/// A named sub-item of a regression test.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub(crate) struct Check {
    pub name: String,
    pub is_checked: bool,
}

impl Check {
    pub(crate) fn icon(&self) -> &'static str {
        if self.is_checked {
            "✅"
        } else {
            "❌"
        }
    }
}

/// Result of one poll.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct StatusReport {
    pub all_checked: bool,
    pub checks: Vec<Check>,
}

impl StatusReport {
    /// An empty list means the run has not reported anything yet, so it does not count as passed.
    pub(crate) fn from_checks(checks: Vec<Check>) -> Self {
        Self {
            all_checked: !checks.is_empty() && checks.iter().all(|c| c.is_checked),
            checks,
        }
    }

    pub(crate) fn pending(&self) -> Vec<String> {
        self.checks
            .iter()
            .filter(|c| !c.is_checked)
            .map(|c| c.name.clone())
            .collect()
    }

    pub(crate) fn passed_count(&self) -> usize {
        self.checks.iter().filter(|c| c.is_checked).count()
    }
}

#[derive(Debug, thiserror::Error)]
pub(crate) enum ServiceError {
    #[error("regression test {0} has not started yet")]
    NotStarted(String),
    #[error("{url} responded with {status}: {body}")]
    Status {
        url: String,
        status: StatusCode,
        body: String,
    },
    #[error("request to {url} failed")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("could not decode response from {url}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

/// Body posted to the trigger webhook.
#[derive(Debug, Serialize)]
pub(crate) struct TriggerPayload<'a> {
    pub repo_owner: &'a str,
    pub repo_name: &'a str,
    pub commit_sha: &'a str,
    pub pr_number: u64,
}

#[derive(Deserialize)]
struct TriggerResponse {
    test_id: Option<String>,
}

pub(crate) struct RegressionService {
    http: reqwest::Client,
    trigger_url: String,
    status_url: String,
    api_key: SecretString,
}

impl RegressionService {
    pub(crate) fn new(args: &ServiceArgs) -> Result<Self> {
        let api_key = args
            .api_key()
            .ok_or_else(|| Error::config("API_KEY (or THIRD_PARTY_API_KEY) is not set"))?;
        let http = reqwest::Client::builder()
            .timeout(args.http_timeout())
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| {
                Error::config(anyhow::Error::new(e).context("failed to build HTTP client"))
            })?;
        Ok(Self {
            http,
            trigger_url: args.trigger_url.clone(),
            status_url: args.status_url.trim_end_matches('/').to_owned(),
            api_key: api_key.clone(),
        })
    }

    /// Start a test run. Returns the run’s id if the webhook reports one.
    pub(crate) async fn trigger(
        &self,
        payload: &TriggerPayload<'_>,
    ) -> Result<Option<String>, ServiceError> {
        let url = &self.trigger_url;
        tracing::info!("Triggering regression test at {url}");
        let resp = self
            .http
            .post(url)
            .bearer_auth(self.api_key.expose_secret())
            .json(payload)
            .send()
            .await
            .map_err(|source| ServiceError::Transport {
                url: url.clone(),
                source,
            })?;
        let status = resp.status();
        let body = resp.text().await.map_err(|source| ServiceError::Decode {
            url: url.clone(),
            source,
        })?;
        if !status.is_success() {
            return Err(ServiceError::Status {
                url: url.clone(),
                status,
                body,
            });
        }
        // the webhook may answer with plain text
        Ok(serde_json::from_str::<TriggerResponse>(&body)
            .ok()
            .and_then(|r| r.test_id))
    }

    pub(crate) fn checks_url(&self, test_id: &str) -> String {
        format!("{}/{test_id}/api/checks", self.status_url)
    }

    pub(crate) async fn fetch_checks(&self, test_id: &str) -> Result<Vec<Check>, ServiceError> {
        let url = self.checks_url(test_id);
        let resp = self
            .http
            .get(&url)
            .header("api-key", self.api_key.expose_secret())
            .send()
            .await
            .map_err(|source| ServiceError::Transport {
                url: url.clone(),
                source,
            })?;
        match resp.status() {
            StatusCode::NOT_FOUND => Err(ServiceError::NotStarted(test_id.to_owned())),
            status if !status.is_success() => Err(ServiceError::Status {
                body: resp.text().await.unwrap_or_default(),
                url,
                status,
            }),
            _ => resp
                .json()
                .await
                .map_err(|source| ServiceError::Decode { url, source }),
        }
    }

    /// Fetch the checks of a run, treating every failure as “not passed yet”.
    pub(crate) async fn poll(&self, test_id: &str) -> StatusReport {
        match self.fetch_checks(test_id).await {
            Ok(checks) => StatusReport::from_checks(checks),
            Err(e @ ServiceError::NotStarted(_)) => {
                tracing::info!("{e}");
                StatusReport::default()
            }
            Err(e) => {
                let transient = e.is_transient();
                tracing::warn!(transient, "Polling failed: {:#}", anyhow::Error::new(e));
                StatusReport::default()
            }
        }
    }
}

impl ServiceError {
    /// Requests that may succeed when repeated unchanged.
    pub(crate) fn is_transient(&self) -> bool {
        match self {
            Self::NotStarted(_) | Self::Transport { .. } => true,
            Self::Status { status, .. } => status.is_server_error(),
            Self::Decode { .. } => false,
        }
    }
}
