use bkt_bitbucket::models::PullRequest;

use crate::{Outcome, PrError, PrOperations};

impl PrOperations<'_> {
    /// Fetch the selected pull request.
    ///
    /// # Errors
    ///
    /// Any selector resolution or service error.
    pub async fn view(&self, selector: Option<&str>) -> Result<Outcome<PullRequest>, PrError> {
        let id = self.resolve(selector).await?;
        let pr = self.client.get_pull_request(self.repo, id).await?;
        Ok(Outcome::new(pr))
    }

    /// The web page of the selected pull request, without fetching it.
    ///
    /// # Errors
    ///
    /// Any selector resolution error.
    pub async fn web_url(&self, selector: Option<&str>) -> Result<String, PrError> {
        let id = self.resolve(selector).await?;
        Ok(self.repo.pull_request_url(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{PRS, client, repo};
    use bkt_testing::{FakeGitRepository, ScriptedEditor, ScriptedPrompter, fixtures};
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn mount_search(server: &MockServer, values: Vec<serde_json::Value>) {
        Mock::given(method("GET"))
            .and(path(PRS))
            .and(query_param(
                "q",
                "source.branch.name=\"feature/x\" AND state=\"OPEN\"",
            ))
            .respond_with(ResponseTemplate::new(200).set_body_json(fixtures::page(values, None)))
            .expect(1)
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_view_current_branch() {
        let server = MockServer::start().await;
        mount_search(&server, vec![fixtures::pull_request(42, "OPEN", "feature/x")]).await;
        Mock::given(method("GET"))
            .and(path(format!("{PRS}/42")))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(fixtures::pull_request(42, "OPEN", "feature/x")),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = client(&server);
        let repo = repo();
        let fake = FakeGitRepository::new().on_branch("feature/x");
        let (prompter, editor) = (ScriptedPrompter::non_interactive(), ScriptedEditor::default());
        let ops = PrOperations::new(&client, &repo, Some(&fake), &prompter, &editor);

        let pr = ops.view(None).await.unwrap().value;
        assert_eq!(pr.id, 42);
        assert_eq!(pr.title, "Pull request 42");
    }

    #[tokio::test]
    async fn test_view_without_pull_request_for_branch() {
        let server = MockServer::start().await;
        mount_search(&server, vec![]).await;

        let client = client(&server);
        let repo = repo();
        let fake = FakeGitRepository::new().on_branch("feature/x");
        let (prompter, editor) = (ScriptedPrompter::non_interactive(), ScriptedEditor::default());
        let ops = PrOperations::new(&client, &repo, Some(&fake), &prompter, &editor);

        let err = ops.view(None).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "no open pull request found for branch \"feature/x\""
        );
    }

    #[tokio::test]
    async fn test_web_url_needs_no_request() {
        let server = MockServer::start().await;
        let client = client(&server);
        let repo = repo();
        let (prompter, editor) = (ScriptedPrompter::non_interactive(), ScriptedEditor::default());
        let ops = PrOperations::new(&client, &repo, None, &prompter, &editor);

        assert_eq!(
            ops.web_url(Some("5")).await.unwrap(),
            "https://bitbucket.org/acme/widgets/pull-requests/5"
        );
        assert!(server.received_requests().await.unwrap().is_empty());
    }
}
