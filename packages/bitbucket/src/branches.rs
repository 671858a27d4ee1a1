//! Branch endpoints.

use bkt_bitbucket_models::Branch;
use bkt_repo_ref::RepoRef;

use crate::client::{segment, slashed_segments};
use crate::{BitbucketClient, BitbucketError};

fn collection_path(repo: &RepoRef) -> String {
    format!(
        "/repositories/{}/{}/refs/branches",
        segment(&repo.workspace),
        segment(&repo.repo_slug)
    )
}

impl BitbucketClient {
    /// List up to `limit` branches.
    ///
    /// # Errors
    ///
    /// Any request or decoding error.
    pub async fn list_branches(
        &self,
        repo: &RepoRef,
        limit: usize,
    ) -> Result<Vec<Branch>, BitbucketError> {
        self.paginate(&collection_path(repo), &[], limit).await
    }

    /// Delete a branch on the service.
    ///
    /// # Errors
    ///
    /// * [`BitbucketError::NotFound`] if the branch does not exist.
    pub async fn delete_branch(&self, repo: &RepoRef, name: &str) -> Result<(), BitbucketError> {
        let path = format!("{}/{}", collection_path(repo), slashed_segments(name));
        self.delete(&path).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> BitbucketClient {
        BitbucketClient::new("tok").unwrap().with_base_url(server.uri())
    }

    #[tokio::test]
    async fn test_list_branches() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repositories/acme/widgets/refs/branches"))
            .and(query_param("pagelen", "30"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "values": [
                    {"name": "main", "target": {"hash": "0123456789abcdef", "message": "Init"}},
                    {"name": "feature/z", "target": {"hash": "fedcba9876543210"}}
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let branches = client(&server)
            .list_branches(&RepoRef::new("acme", "widgets"), 30)
            .await
            .unwrap();
        assert_eq!(branches.len(), 2);
        assert_eq!(branches[1].name, "feature/z");
        assert_eq!(branches[1].target.message, "");
    }

    #[tokio::test]
    async fn test_delete_branch_keeps_slashes() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/repositories/acme/widgets/refs/branches/feature/z"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        client(&server)
            .delete_branch(&RepoRef::new("acme", "widgets"), "feature/z")
            .await
            .unwrap();
    }
}
