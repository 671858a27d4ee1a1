//! Repository metadata.

use bkt_bitbucket_models::Repository;
use bkt_repo_ref::RepoRef;

use crate::client::segment;
use crate::{BitbucketClient, BitbucketError};

impl BitbucketClient {
    /// # Errors
    ///
    /// * [`BitbucketError::NotFound`] if the repository does not exist or is
    ///   not visible to the token.
    pub async fn get_repository(&self, repo: &RepoRef) -> Result<Repository, BitbucketError> {
        let path = format!(
            "/repositories/{}/{}",
            segment(&repo.workspace),
            segment(&repo.repo_slug)
        );
        Self::parse(&self.get(&path, &[]).await?)
    }

    /// The repository's main branch.
    ///
    /// # Errors
    ///
    /// * [`BitbucketError::Malformed`] if the repository has no main branch.
    pub async fn default_branch(&self, repo: &RepoRef) -> Result<String, BitbucketError> {
        self.get_repository(repo)
            .await?
            .mainbranch
            .map(|branch| branch.name)
            .ok_or_else(|| BitbucketError::Malformed {
                message: format!("repository {repo} has no main branch"),
            })
    }
}
