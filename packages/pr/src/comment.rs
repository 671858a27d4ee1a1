use bkt_bitbucket::BitbucketClient;
use bkt_bitbucket::models::Comment;

use crate::{Outcome, PrError, PrOperations};

const COMMENT_TEMPLATE: &str =
    "\n# Write your comment above. Lines starting with # are ignored.\n";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentResult {
    pub id: Option<u64>,
    pub url: String,
}

impl PrOperations<'_> {
    /// The given body, or one written in the editor when it is absent.
    pub(crate) fn comment_body(&self, body: Option<&str>) -> Result<String, PrError> {
        let body = match body.map(str::trim).filter(|b| !b.is_empty()) {
            Some(body) => body.to_string(),
            None => self.editor.edit(COMMENT_TEMPLATE)?,
        };
        if body.trim().is_empty() {
            return Err(PrError::EmptyBody);
        }
        Ok(body)
    }

    /// Post `body` and return a link to the comment.
    ///
    /// The link falls back to the pull request page when the response cannot
    /// be decoded.
    pub(crate) async fn post_comment(&self, id: u64, body: &str) -> Result<CommentResult, PrError> {
        let response = self
            .client
            .comment_on_pull_request(self.repo, id, body)
            .await?;
        let fallback = self.repo.pull_request_url(id);

        Ok(match BitbucketClient::parse::<Comment>(&response) {
            Ok(comment) => CommentResult {
                id: Some(comment.id),
                url: comment
                    .links
                    .html_href()
                    .map_or(fallback, ToString::to_string),
            },
            Err(e) => {
                log::debug!("Comment posted but response did not decode: {e}");
                CommentResult {
                    id: None,
                    url: fallback,
                }
            }
        })
    }

    /// Comment on a pull request.
    ///
    /// # Errors
    ///
    /// * [`PrError::EmptyBody`] when the body is empty after editing.
    /// * [`PrError::Terminal`] if the editor fails.
    /// * Any selector resolution or service error.
    pub async fn comment(
        &self,
        selector: Option<&str>,
        body: Option<&str>,
    ) -> Result<Outcome<CommentResult>, PrError> {
        let id = self.resolve(selector).await?;
        let body = self.comment_body(body)?;
        Ok(Outcome::new(self.post_comment(id, &body).await?))
    }
}
