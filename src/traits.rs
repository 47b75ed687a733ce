use crate::error::Result;
use crate::runner::Phase;
use crate::service::StatusReport;

/// Where the poll loop reports progress after each poll.
pub(crate) trait StatusPublisher {
    async fn publish(&self, phase: Phase, test_id: &str, report: &StatusReport) -> Result<()>;
}
