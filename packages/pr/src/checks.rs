use bkt_bitbucket::models::{CommitStatus, CommitStatusState};

use crate::{Outcome, PrError, PrOperations};

#[must_use]
pub const fn status_symbol(state: CommitStatusState) -> &'static str {
    match state {
        CommitStatusState::Successful => "✓",
        CommitStatusState::Failed => "✗",
        CommitStatusState::Inprogress => "○",
        CommitStatusState::Stopped => "◌",
    }
}

impl PrOperations<'_> {
    /// Build statuses of a pull request.
    ///
    /// # Errors
    ///
    /// Any selector resolution or service error.
    pub async fn checks(&self, selector: Option<&str>) -> Result<Outcome<Vec<CommitStatus>>, PrError> {
        let id = self.resolve(selector).await?;
        let statuses = self
            .client
            .list_pull_request_statuses(self.repo, id)
            .await?;
        Ok(Outcome::new(statuses))
    }
}
