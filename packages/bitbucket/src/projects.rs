//! Project endpoints.

use bkt_bitbucket_models::{NewProject, Project};

use crate::client::segment;
use crate::{BitbucketClient, BitbucketError};

fn collection_path(workspace: &str) -> String {
    format!("/workspaces/{}/projects", segment(workspace))
}

impl BitbucketClient {
    /// # Errors
    ///
    /// Any request or decoding error.
    pub async fn list_projects(
        &self,
        workspace: &str,
        limit: usize,
    ) -> Result<Vec<Project>, BitbucketError> {
        self.paginate(&collection_path(workspace), &[], limit).await
    }

    /// # Errors
    ///
    /// * [`BitbucketError::NotFound`] if no project has this key.
    pub async fn get_project(&self, workspace: &str, key: &str) -> Result<Project, BitbucketError> {
        let path = format!("{}/{}", collection_path(workspace), segment(key));
        Self::parse(&self.get(&path, &[]).await?)
    }

    /// # Errors
    ///
    /// Any request or decoding error. A duplicate key surfaces as
    /// [`BitbucketError::BadRequest`] or [`BitbucketError::Conflict`].
    pub async fn create_project(
        &self,
        workspace: &str,
        project: &NewProject,
    ) -> Result<Project, BitbucketError> {
        Self::parse(
            &self
                .post(&collection_path(workspace), Some(project))
                .await?,
        )
    }
}
