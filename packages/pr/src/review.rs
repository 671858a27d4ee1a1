use crate::{Outcome, PrError, PrOperations};

/// The review verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewAction {
    Approve,
    RequestChanges,
    Comment,
}

impl ReviewAction {
    /// Past-tense phrase for confirmation messages.
    #[must_use]
    pub const fn past_tense(self) -> &'static str {
        match self {
            Self::Approve => "Approved",
            Self::RequestChanges => "Requested changes on",
            Self::Comment => "Commented on",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReviewOptions {
    pub approve: bool,
    pub request_changes: bool,
    pub comment: bool,
    pub body: Option<String>,
}

impl ReviewOptions {
    /// The single selected action.
    ///
    /// # Errors
    ///
    /// * [`PrError::InvalidReviewAction`] unless exactly one flag is set.
    pub fn action(&self) -> Result<ReviewAction, PrError> {
        match (self.approve, self.request_changes, self.comment) {
            (true, false, false) => Ok(ReviewAction::Approve),
            (false, true, false) => Ok(ReviewAction::RequestChanges),
            (false, false, true) => Ok(ReviewAction::Comment),
            _ => Err(PrError::InvalidReviewAction),
        }
    }
}

impl PrOperations<'_> {
    /// Approve, request changes on, or comment on a pull request.
    ///
    /// A body is posted as a comment before the verdict. A comment review
    /// without a body takes one from the editor.
    ///
    /// # Errors
    ///
    /// * [`PrError::InvalidReviewAction`] unless exactly one action is set,
    ///   before any request.
    /// * Any selector resolution, editor or service error.
    pub async fn review(
        &self,
        selector: Option<&str>,
        options: &ReviewOptions,
    ) -> Result<Outcome<(u64, ReviewAction)>, PrError> {
        let action = options.action()?;
        let id = self.resolve(selector).await?;

        let body = options.body.as_deref().map(str::trim).filter(|b| !b.is_empty());
        match action {
            ReviewAction::Comment => {
                let body = self.comment_body(body)?;
                self.post_comment(id, &body).await?;
            }
            ReviewAction::Approve | ReviewAction::RequestChanges => {
                if let Some(body) = body {
                    self.post_comment(id, body).await?;
                }
                if action == ReviewAction::Approve {
                    self.client.approve_pull_request(self.repo, id).await?;
                } else {
                    self.client.request_changes(self.repo, id).await?;
                }
            }
        }

        Ok(Outcome::new((id, action)))
    }
}
