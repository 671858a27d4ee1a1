use bkt_bitbucket::models::{EndpointRef, PullRequest, PullRequestUpdate};

use crate::{Outcome, PrError, PrOperations};

/// Fields to change. Empty strings count as unset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditOptions {
    pub title: Option<String>,
    pub body: Option<String>,
    /// New destination branch.
    pub base: Option<String>,
}

impl EditOptions {
    fn to_update(&self) -> PullRequestUpdate {
        let set = |value: &Option<String>| value.clone().filter(|v| !v.trim().is_empty());
        PullRequestUpdate {
            title: set(&self.title),
            description: set(&self.body),
            destination: set(&self.base).map(EndpointRef::branch),
            state: None,
        }
    }
}

impl PrOperations<'_> {
    /// Update the title, description or destination of a pull request.
    ///
    /// # Errors
    ///
    /// * [`PrError::NothingToEdit`] when no field is set, before any request.
    /// * Any selector resolution or service error.
    pub async fn edit(
        &self,
        selector: Option<&str>,
        options: &EditOptions,
    ) -> Result<Outcome<PullRequest>, PrError> {
        let update = options.to_update();
        if update.is_empty() {
            return Err(PrError::NothingToEdit);
        }

        let id = self.resolve(selector).await?;
        let pr = self.client.update_pull_request(self.repo, id, &update).await?;
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
    async fn test_sends_only_given_fields() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path(format!("{PRS}/7")))
            .and(body_json(serde_json::json!({
                "title": "Better title",
                "destination": {"branch": {"name": "release"}}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(fixtures::pull_request(7, "OPEN", "a")))
            .expect(1)
            .mount(&server)
            .await;

        let client = client(&server);
        let repo = repo();
        let (prompter, editor) = (ScriptedPrompter::non_interactive(), ScriptedEditor::default());
        let ops = PrOperations::new(&client, &repo, None, &prompter, &editor);

        let options = EditOptions {
            title: Some("Better title".to_string()),
            body: Some(String::new()),
            base: Some("release".to_string()),
        };
        assert_eq!(ops.edit(Some("7"), &options).await.unwrap().value.id, 7);
    }

    #[tokio::test]
    async fn test_nothing_to_edit() {
        let server = MockServer::start().await;
        let client = client(&server);
        let repo = repo();
        let (prompter, editor) = (ScriptedPrompter::non_interactive(), ScriptedEditor::default());
        let ops = PrOperations::new(&client, &repo, None, &prompter, &editor);

        let err = ops.edit(Some("7"), &EditOptions::default()).await.unwrap_err();
        assert!(matches!(err, PrError::NothingToEdit));
        assert!(server.received_requests().await.unwrap().is_empty());
    }
}
