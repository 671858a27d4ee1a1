//! Pull-request endpoints.

use bkt_bitbucket_models::{
    CommitStatus, MergeRequest, NewComment, NewPullRequest, PrState, PullRequest,
    PullRequestUpdate,
};
use bkt_repo_ref::RepoRef;
use reqwest::Method;

use crate::client::{Accept, ApiRequest, LONG_TIMEOUT, filter_literal, segment};
use crate::{BitbucketClient, BitbucketError, Response};

/// Filters for listing pull requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestQuery {
    pub state: PrState,
    /// Author nickname.
    pub author: Option<String>,
    pub limit: usize,
}

impl Default for PullRequestQuery {
    fn default() -> Self {
        Self {
            state: PrState::Open,
            author: None,
            limit: 30,
        }
    }
}

fn collection_path(repo: &RepoRef) -> String {
    format!(
        "/repositories/{}/{}/pullrequests",
        segment(&repo.workspace),
        segment(&repo.repo_slug)
    )
}

fn item_path(repo: &RepoRef, id: u64) -> String {
    format!("{}/{id}", collection_path(repo))
}

/// The `q=` filter that finds open pull requests from `branch`.
#[must_use]
pub(crate) fn open_for_branch_filter(branch: &str) -> String {
    format!(
        "source.branch.name={} AND state=\"OPEN\"",
        filter_literal(branch)
    )
}

impl BitbucketClient {
    /// List pull requests, newest first.
    ///
    /// # Errors
    ///
    /// Any request or decoding error.
    pub async fn list_pull_requests(
        &self,
        repo: &RepoRef,
        query: &PullRequestQuery,
    ) -> Result<Vec<PullRequest>, BitbucketError> {
        let mut params = vec![("state", query.state.to_string())];
        if let Some(author) = &query.author {
            params.push(("q", format!("author.nickname={}", filter_literal(author))));
        }

        self.paginate(&collection_path(repo), &params, query.limit)
            .await
    }

    /// The first open pull request whose source is `branch`, if any.
    ///
    /// # Errors
    ///
    /// Any request or decoding error.
    pub async fn find_open_pull_request(
        &self,
        repo: &RepoRef,
        branch: &str,
    ) -> Result<Option<PullRequest>, BitbucketError> {
        let query = [("q", open_for_branch_filter(branch))];
        let found: Vec<PullRequest> = self.paginate(&collection_path(repo), &query, 1).await?;
        Ok(found.into_iter().next())
    }

    /// # Errors
    ///
    /// * [`BitbucketError::NotFound`] if the pull request does not exist.
    pub async fn get_pull_request(
        &self,
        repo: &RepoRef,
        id: u64,
    ) -> Result<PullRequest, BitbucketError> {
        Self::parse(&self.get(&item_path(repo, id), &[]).await?)
    }

    /// # Errors
    ///
    /// Any request or decoding error. A duplicate surfaces as
    /// [`BitbucketError::BadRequest`] or [`BitbucketError::Conflict`].
    pub async fn create_pull_request(
        &self,
        repo: &RepoRef,
        body: &NewPullRequest,
    ) -> Result<PullRequest, BitbucketError> {
        let path = collection_path(repo);
        let request = ApiRequest::new(Method::POST, &path)
            .with_json(body)?
            .with_timeout(LONG_TIMEOUT);
        Self::parse(&self.send(request).await?)
    }

    /// # Errors
    ///
    /// Any request or decoding error.
    pub async fn update_pull_request(
        &self,
        repo: &RepoRef,
        id: u64,
        update: &PullRequestUpdate,
    ) -> Result<PullRequest, BitbucketError> {
        Self::parse(&self.put(&item_path(repo, id), update).await?)
    }

    /// Move a declined pull request back to `OPEN`.
    ///
    /// # Errors
    ///
    /// Any request or decoding error.
    pub async fn reopen_pull_request(
        &self,
        repo: &RepoRef,
        id: u64,
    ) -> Result<PullRequest, BitbucketError> {
        let update = PullRequestUpdate {
            state: Some(PrState::Open),
            ..PullRequestUpdate::default()
        };
        self.update_pull_request(repo, id, &update).await
    }

    /// # Errors
    ///
    /// Any request error.
    pub async fn approve_pull_request(&self, repo: &RepoRef, id: u64) -> Result<(), BitbucketError> {
        let path = format!("{}/approve", item_path(repo, id));
        self.post::<()>(&path, None).await?;
        Ok(())
    }

    /// # Errors
    ///
    /// Any request error.
    pub async fn request_changes(&self, repo: &RepoRef, id: u64) -> Result<(), BitbucketError> {
        let path = format!("{}/request-changes", item_path(repo, id));
        self.post::<()>(&path, None).await?;
        Ok(())
    }

    /// # Errors
    ///
    /// Any request or decoding error.
    pub async fn decline_pull_request(
        &self,
        repo: &RepoRef,
        id: u64,
    ) -> Result<PullRequest, BitbucketError> {
        let path = format!("{}/decline", item_path(repo, id));
        Self::parse(&self.post::<()>(&path, None).await?)
    }

    /// Merge a pull request.
    ///
    /// Returns the merged pull request when the service answers with it.
    /// Asynchronous merges answer `202` with a task body instead, which
    /// yields `None`.
    ///
    /// # Errors
    ///
    /// Any request error.
    pub async fn merge_pull_request(
        &self,
        repo: &RepoRef,
        id: u64,
        body: &MergeRequest,
    ) -> Result<Option<PullRequest>, BitbucketError> {
        let path = format!("{}/merge", item_path(repo, id));
        let request = ApiRequest::new(Method::POST, &path)
            .with_json(body)?
            .with_timeout(LONG_TIMEOUT);
        let response = self.send(request).await?;

        match Self::parse(&response) {
            Ok(pr) => Ok(Some(pr)),
            Err(e) => {
                log::debug!("Merge of #{id} returned no pull request body: {e}");
                Ok(None)
            }
        }
    }

    /// Post a comment. The raw response is returned so the caller can
    /// recover when the body does not decode.
    ///
    /// # Errors
    ///
    /// Any request error.
    pub async fn comment_on_pull_request(
        &self,
        repo: &RepoRef,
        id: u64,
        body: &str,
    ) -> Result<Response, BitbucketError> {
        let path = format!("{}/comments", item_path(repo, id));
        self.post(&path, Some(&NewComment::new(body))).await
    }

    /// Build statuses reported against the pull request's commits.
    ///
    /// # Errors
    ///
    /// Any request or decoding error.
    pub async fn list_pull_request_statuses(
        &self,
        repo: &RepoRef,
        id: u64,
    ) -> Result<Vec<CommitStatus>, BitbucketError> {
        let path = format!("{}/statuses", item_path(repo, id));
        self.paginate(&path, &[], usize::MAX).await
    }

    /// Fetch a unified diff as text.
    ///
    /// `diff_url` is normally the pull request's `links.diff.href`; the
    /// canonical `/diff` path is used when it is absent.
    ///
    /// # Errors
    ///
    /// Any request error.
    pub async fn get_pull_request_diff(
        &self,
        repo: &RepoRef,
        id: u64,
        diff_url: Option<&str>,
    ) -> Result<String, BitbucketError> {
        let fallback = format!("{}/diff", item_path(repo, id));
        let path = diff_url.unwrap_or(&fallback);
        let response = self
            .send(ApiRequest::new(Method::GET, path).with_accept(Accept::Text))
            .await?;
        Ok(response.text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bkt_bitbucket_models::{EndpointRef, MergeStrategy};
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn repo() -> RepoRef {
        RepoRef::new("acme", "widgets")
    }

    fn client(server: &MockServer) -> BitbucketClient {
        BitbucketClient::new("tok").unwrap().with_base_url(server.uri())
    }

    fn pr_json(id: u64, state: &str, source: &str) -> serde_json::Value {
        serde_json::json!({
            "id": id,
            "title": format!("PR {id}"),
            "state": state,
            "source": {"branch": {"name": source}},
            "destination": {"branch": {"name": "main"}},
            "links": {
                "html": {"href": format!("https://bitbucket.org/acme/widgets/pull-requests/{id}")}
            }
        })
    }

    #[test_log::test(tokio::test)]
    async fn test_list_merged_with_limit_issues_one_request() {
        env_logger::try_init().ok();

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repositories/acme/widgets/pullrequests"))
            .and(query_param("state", "MERGED"))
            .and(query_param("pagelen", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "values": [pr_json(10, "MERGED", "a"), pr_json(9, "MERGED", "b")],
                "size": 3,
                "next": format!("{}/repositories/acme/widgets/pullrequests?page=2", server.uri()),
            })))
            .expect(1)
            .mount(&server)
            .await;

        let query = PullRequestQuery {
            state: PrState::Merged,
            author: None,
            limit: 2,
        };
        let prs = client(&server)
            .list_pull_requests(&repo(), &query)
            .await
            .unwrap();

        assert_eq!(prs.iter().map(|pr| pr.id).collect::<Vec<_>>(), vec![10, 9]);
    }

    #[tokio::test]
    async fn test_list_filters_by_author() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repositories/acme/widgets/pullrequests"))
            .and(query_param("q", "author.nickname=\"jdoe\""))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"values": []})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let query = PullRequestQuery {
            author: Some("jdoe".to_string()),
            ..PullRequestQuery::default()
        };
        let prs = client(&server)
            .list_pull_requests(&repo(), &query)
            .await
            .unwrap();
        assert!(prs.is_empty());
    }

    #[tokio::test]
    async fn test_find_open_pull_request_uses_branch_filter() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repositories/acme/widgets/pullrequests"))
            .and(query_param(
                "q",
                "source.branch.name=\"feature/x\" AND state=\"OPEN\"",
            ))
            .and(query_param("pagelen", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "values": [pr_json(42, "OPEN", "feature/x")],
            })))
            .expect(1)
            .mount(&server)
            .await;

        let pr = client(&server)
            .find_open_pull_request(&repo(), "feature/x")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(pr.id, 42);
    }

    #[tokio::test]
    async fn test_get_missing_pull_request_is_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repositories/acme/widgets/pullrequests/99"))
            .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
                "type": "error",
                "error": {"message": "Resource not found"}
            })))
            .mount(&server)
            .await;

        let err = client(&server)
            .get_pull_request(&repo(), 99)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "pull request not found: Resource not found");
    }

    #[tokio::test]
    async fn test_create_sends_branches_and_title() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/repositories/acme/widgets/pullrequests"))
            .and(body_json(serde_json::json!({
                "title": "Add widgets",
                "source": {"branch": {"name": "feature/x"}},
                "destination": {"branch": {"name": "main"}},
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(pr_json(5, "OPEN", "feature/x")))
            .expect(1)
            .mount(&server)
            .await;

        let body = NewPullRequest {
            title: "Add widgets".to_string(),
            description: String::new(),
            source: EndpointRef::branch("feature/x"),
            destination: EndpointRef::branch("main"),
            reviewers: Vec::new(),
        };
        let pr = client(&server)
            .create_pull_request(&repo(), &body)
            .await
            .unwrap();
        assert_eq!(pr.id, 5);
    }

    #[tokio::test]
    async fn test_reopen_puts_open_state() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/repositories/acme/widgets/pullrequests/8"))
            .and(body_json(serde_json::json!({"state": "OPEN"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(pr_json(8, "OPEN", "a")))
            .expect(1)
            .mount(&server)
            .await;

        let pr = client(&server)
            .reopen_pull_request(&repo(), 8)
            .await
            .unwrap();
        assert_eq!(pr.state, PrState::Open);
    }

    #[tokio::test]
    async fn test_merge_tolerates_task_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/repositories/acme/widgets/pullrequests/3/merge"))
            .and(body_json(serde_json::json!({"merge_strategy": "squash"})))
            .respond_with(ResponseTemplate::new(202).set_body_json(serde_json::json!({
                "task_status": "PENDING"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let body = MergeRequest {
            merge_strategy: MergeStrategy::Squash,
            message: None,
            close_source_branch: None,
        };
        let merged = client(&server)
            .merge_pull_request(&repo(), 3, &body)
            .await
            .unwrap();
        assert!(merged.is_none());
    }

    #[tokio::test]
    async fn test_approve_and_request_changes() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/repositories/acme/widgets/pullrequests/4/approve"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/repositories/acme/widgets/pullrequests/4/request-changes"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .expect(1)
            .mount(&server)
            .await;

        let client = client(&server);
        client.approve_pull_request(&repo(), 4).await.unwrap();
        client.request_changes(&repo(), 4).await.unwrap();
    }

    #[tokio::test]
    async fn test_diff_requests_plain_text_from_link() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/diffs/feature-x"))
            .and(header("accept", "text/plain"))
            .respond_with(ResponseTemplate::new(200).set_body_string("diff --git a/x b/x\n"))
            .expect(1)
            .mount(&server)
            .await;

        let link = format!("{}/diffs/feature-x", server.uri());
        let diff = client(&server)
            .get_pull_request_diff(&repo(), 1, Some(&link))
            .await
            .unwrap();
        assert_eq!(diff, "diff --git a/x b/x\n");
    }

    #[tokio::test]
    async fn test_comment_posts_raw_content() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/repositories/acme/widgets/pullrequests/6/comments"))
            .and(body_json(serde_json::json!({"content": {"raw": "LGTM"}})))
            .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
                "id": 77,
                "content": {"raw": "LGTM"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let response = client(&server)
            .comment_on_pull_request(&repo(), 6, "LGTM")
            .await
            .unwrap();
        assert_eq!(response.status.as_u16(), 201);
    }

    #[test]
    fn test_branch_filter_escapes_quotes() {
        assert_eq!(
            open_for_branch_filter(r#"odd"name"#),
            r#"source.branch.name="odd\"name" AND state="OPEN""#
        );
    }
}
