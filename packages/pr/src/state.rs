use bkt_bitbucket::models::{PrState, PullRequest};

use crate::{Outcome, PrError, PrOperations};

impl PrOperations<'_> {
    /// Decline a pull request, optionally commenting first.
    ///
    /// # Errors
    ///
    /// Any selector resolution or service error.
    pub async fn close(
        &self,
        selector: Option<&str>,
        comment: Option<&str>,
    ) -> Result<Outcome<PullRequest>, PrError> {
        let id = self.resolve(selector).await?;

        if let Some(comment) = comment.map(str::trim).filter(|c| !c.is_empty()) {
            self.client
                .comment_on_pull_request(self.repo, id, comment)
                .await?;
        }

        let pr = self.client.decline_pull_request(self.repo, id).await?;
        Ok(Outcome::new(pr))
    }

    /// Reopen a declined pull request.
    ///
    /// # Errors
    ///
    /// * [`PrError::ReopenInvalid`] unless the pull request is `DECLINED`.
    /// * Any selector resolution or service error.
    pub async fn reopen(&self, selector: Option<&str>) -> Result<Outcome<PullRequest>, PrError> {
        let id = self.resolve(selector).await?;
        let pr = self.client.get_pull_request(self.repo, id).await?;
        if pr.state != PrState::Declined {
            return Err(PrError::ReopenInvalid { id, state: pr.state });
        }

        let pr = self.client.reopen_pull_request(self.repo, id).await?;
        Ok(Outcome::new(pr))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{PRS, client, repo};
    use bkt_testing::{ScriptedEditor, ScriptedPrompter, fixtures};
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_close_comments_then_declines() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(format!("{PRS}/9/comments")))
            .and(body_json(serde_json::json!({"content": {"raw": "Superseded by #10"}})))
            .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
                "id": 1, "content": {"raw": "Superseded by #10"}
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path(format!("{PRS}/9/decline")))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(fixtures::pull_request(9, "DECLINED", "a")),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = client(&server);
        let repo = repo();
        let (prompter, editor) = (ScriptedPrompter::non_interactive(), ScriptedEditor::default());
        let ops = PrOperations::new(&client, &repo, None, &prompter, &editor);

        let pr = ops.close(Some("9"), Some("Superseded by #10")).await.unwrap().value;
        assert_eq!(pr.state, PrState::Declined);

        let requests = server.received_requests().await.unwrap();
        assert!(requests[0].url.path().ends_with("/comments"));
        assert!(requests[1].url.path().ends_with("/decline"));
    }

    #[tokio::test]
    async fn test_reopen_declined() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(format!("{PRS}/9")))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(fixtures::pull_request(9, "DECLINED", "a")),
            )
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path(format!("{PRS}/9")))
            .and(body_json(serde_json::json!({"state": "OPEN"})))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(fixtures::pull_request(9, "OPEN", "a")),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = client(&server);
        let repo = repo();
        let (prompter, editor) = (ScriptedPrompter::non_interactive(), ScriptedEditor::default());
        let ops = PrOperations::new(&client, &repo, None, &prompter, &editor);

        assert_eq!(ops.reopen(Some("9")).await.unwrap().value.state, PrState::Open);
    }

    #[tokio::test]
    async fn test_reopen_merged_fails() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(format!("{PRS}/9")))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(fixtures::pull_request(9, "MERGED", "a")),
            )
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let client = client(&server);
        let repo = repo();
        let (prompter, editor) = (ScriptedPrompter::non_interactive(), ScriptedEditor::default());
        let ops = PrOperations::new(&client, &repo, None, &prompter, &editor);

        let err = ops.reopen(Some("9")).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "pull request #9 cannot be reopened (state: MERGED)"
        );
    }
}
