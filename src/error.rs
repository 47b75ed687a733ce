use std::process::ExitCode;

use crate::service::ServiceError;

pub(crate) type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub(crate) enum Error {
    #[error("configuration error: {0}")]
    Config(String),
    #[error("GitHub API request failed")]
    GitHub(#[from] octocrab::Error),
    #[error(transparent)]
    Service(#[from] ServiceError),
    #[error("failed to render comment")]
    Render(#[from] askama::Error),
    #[error("regression test {test_id} did not pass after {attempts} polls")]
    Timeout { test_id: String, attempts: u32 },
    #[error("regression test {test_id} is not passing, pending checks: {}", .pending.join(", "))]
    Failed { test_id: String, pending: Vec<String> },
    #[error("comment does not contain `/confirm-regression <test_id>`")]
    InvalidCommand,
}

impl Error {
    pub(crate) fn config(e: impl std::fmt::Display) -> Self {
        Self::Config(format!("{e:#}"))
    }

    /// Process exit status: 1 test failed, 2 bad configuration or usage,
    /// 3 network or rendering trouble, 4 timed out.
    pub(crate) fn code(&self) -> u8 {
        match self {
            Self::Failed { .. } => 1,
            Self::Config(_) | Self::InvalidCommand => 2,
            Self::GitHub(_) | Self::Service(_) | Self::Render(_) => 3,
            Self::Timeout { .. } => 4,
        }
    }

    pub(crate) fn exit_code(&self) -> ExitCode {
        ExitCode::from(self.code())
    }

    /// This error followed by its sources, separated by colons.
    pub(crate) fn chain(&self) -> String {
        let mut message = self.to_string();
        let mut source = std::error::Error::source(self);
        while let Some(e) = source {
            message.push_str(": ");
            message.push_str(&e.to_string());
            source = e.source();
        }
        message
    }
}
