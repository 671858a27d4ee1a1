use std::str::FromStr;

use bkt_bitbucket::PullRequestQuery;
use bkt_bitbucket::models::{PrState, PullRequest};

use crate::{Outcome, PrError, PrOperations};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListOptions {
    /// `OPEN`, `MERGED` or `DECLINED`, any case. Defaults to `OPEN`.
    pub state: Option<String>,
    pub author: Option<String>,
    pub limit: usize,
}

impl ListOptions {
    pub const DEFAULT_LIMIT: usize = 30;
}

impl Default for ListOptions {
    fn default() -> Self {
        Self {
            state: None,
            author: None,
            limit: Self::DEFAULT_LIMIT,
        }
    }
}

/// Parse a state filter case-insensitively.
fn parse_state(value: Option<&str>) -> Result<PrState, PrError> {
    value.map_or(Ok(PrState::Open), |value| {
        PrState::from_str(value.trim()).map_err(|_| PrError::InvalidState {
            value: value.to_string(),
        })
    })
}

impl PrOperations<'_> {
    /// List pull requests, most recent first.
    ///
    /// # Errors
    ///
    /// * [`PrError::InvalidState`] for an unknown state, before any request.
    /// * [`PrError::Api`] on service failure.
    pub async fn list(&self, options: &ListOptions) -> Result<Outcome<Vec<PullRequest>>, PrError> {
        let query = PullRequestQuery {
            state: parse_state(options.state.as_deref())?,
            author: options.author.clone().filter(|a| !a.is_empty()),
            limit: options.limit,
        };

        let prs = self.client.list_pull_requests(self.repo, &query).await?;
        log::debug!("Listed {} {} pull requests", prs.len(), query.state);
        Ok(Outcome::new(prs))
    }
}
