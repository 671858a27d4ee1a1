//! Workspace membership and user lookup.

use bkt_bitbucket_models::{Account, WorkspaceMembership};

use crate::client::segment;
use crate::{BitbucketClient, BitbucketError};

impl BitbucketClient {
    /// All members of a workspace.
    ///
    /// # Errors
    ///
    /// Any request or decoding error.
    pub async fn list_workspace_members(
        &self,
        workspace: &str,
    ) -> Result<Vec<Account>, BitbucketError> {
        let path = format!("/workspaces/{}/members", segment(workspace));
        let members: Vec<WorkspaceMembership> = self.paginate(&path, &[], usize::MAX).await?;
        Ok(members.into_iter().map(|m| m.user).collect())
    }

    /// Look up an account by username, account id or UUID.
    ///
    /// # Errors
    ///
    /// * [`BitbucketError::NotFound`] if no such user exists.
    pub async fn get_user(&self, username: &str) -> Result<Account, BitbucketError> {
        let path = format!("/users/{}", segment(username));
        Self::parse(&self.get(&path, &[]).await?)
    }
}
