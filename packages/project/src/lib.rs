#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Project listing, lookup and creation within a workspace.

use bkt_bitbucket::models::{NewProject, Project};
use bkt_bitbucket::{BitbucketClient, BitbucketError};

pub const DEFAULT_LIMIT: usize = 30;

#[derive(Debug, thiserror::Error)]
pub enum ProjectError {
    #[error("project key is required")]
    MissingKey,

    #[error("invalid project key \"{key}\"; keys contain only letters and digits")]
    InvalidKey { key: String },

    #[error(transparent)]
    Api(#[from] BitbucketError),
}

/// Arguments to [`create`].
#[derive(Debug, Clone, Default)]
pub struct CreateProject {
    pub key: String,
    /// Defaults to the key.
    pub name: Option<String>,
    pub description: Option<String>,
    pub private: bool,
}

/// Trim and upper-case a project key.
///
/// # Errors
///
/// * [`ProjectError::MissingKey`] if the key is blank.
/// * [`ProjectError::InvalidKey`] if it contains anything but ASCII letters
///   and digits.
pub fn normalize_key(key: &str) -> Result<String, ProjectError> {
    let key = key.trim();
    if key.is_empty() {
        return Err(ProjectError::MissingKey);
    }
    if !key.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(ProjectError::InvalidKey {
            key: key.to_string(),
        });
    }
    Ok(key.to_ascii_uppercase())
}

/// # Errors
///
/// Any service error.
pub async fn list(
    client: &BitbucketClient,
    workspace: &str,
    limit: usize,
) -> Result<Vec<Project>, ProjectError> {
    Ok(client.list_projects(workspace, limit).await?)
}

/// # Errors
///
/// * [`ProjectError::MissingKey`] if the key is blank.
/// * Any service error, including `NotFound` for an unknown key.
pub async fn view(
    client: &BitbucketClient,
    workspace: &str,
    key: &str,
) -> Result<Project, ProjectError> {
    let key = key.trim();
    if key.is_empty() {
        return Err(ProjectError::MissingKey);
    }
    Ok(client.get_project(workspace, key).await?)
}

/// # Errors
///
/// * Key validation errors from [`normalize_key`], before any request.
/// * Any service error.
pub async fn create(
    client: &BitbucketClient,
    workspace: &str,
    options: &CreateProject,
) -> Result<Project, ProjectError> {
    let key = normalize_key(&options.key)?;
    let body = NewProject {
        name: options
            .name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map_or_else(|| key.clone(), ToString::to_string),
        key,
        description: options
            .description
            .clone()
            .filter(|description| !description.trim().is_empty()),
        is_private: options.private,
    };

    log::debug!("creating project {} in {workspace}", body.key);
    Ok(client.create_project(workspace, &body).await?)
}
