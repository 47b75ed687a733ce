use octocrab::models::issues::Comment;

pub(crate) const DEFAULT_TRIGGER_URL: &str =
    "https://webhooks.aftership.com/datarecce/webhooks/recce_check";
pub(crate) const DEFAULT_STATUS_URL: &str = "https://webhooks.aftership.com/recce";
pub(crate) const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";
/// 120 polls at the default 5s interval: about 10 minutes.
pub(crate) const DEFAULT_MAX_ATTEMPTS: u32 = 120;

pub(crate) const CHECK_RUN_NAME: &str = "Regression Test";
pub(crate) const STATUS_COMMENT_MARKER: &str = "Regression Test Status";
pub(crate) const CONFIRM_COMMAND: &str = "/confirm-regression";

/// GitHub rejects check run output fields longer than this.
pub(crate) const CHECK_RUN_TEXT_LIMIT: usize = 65535;

pub(crate) fn is_status_comment(comment: &Comment) -> bool {
    comment
        .body
        .as_ref()
        .is_some_and(|body| body.contains(STATUS_COMMENT_MARKER))
}
