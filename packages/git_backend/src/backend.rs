//! Working-copy backend and repository traits.
//!
//! These traits abstract over git implementations for testability.

use std::path::Path;

use bkt_git_backend_models::{CommitInfo, GitBackendError, RemoteEntry};

/// Name of the remote preferred when several point at the service.
pub const DEFAULT_REMOTE_NAME: &str = "origin";

/// Factory trait for opening working copies.
pub trait GitBackend: Send + Sync {
    /// Discover a working copy by walking up from the given path.
    ///
    /// # Errors
    ///
    /// Returns `GitBackendError::NotAWorkingCopy` if no repository is found.
    fn discover(&self, path: &Path) -> Result<Box<dyn GitRepository>, GitBackendError>;
}

/// Operations on the enclosing checkout.
///
/// Only `Send` is required: `git2::Repository` is not thread-safe.
pub trait GitRepository: Send {
    // === Inspection ===

    /// List the configured remotes.
    ///
    /// # Errors
    ///
    /// Returns an error if the repository configuration cannot be read.
    fn list_remotes(&self) -> Result<Vec<RemoteEntry>, GitBackendError>;

    /// Name of the checked-out branch.
    ///
    /// # Errors
    ///
    /// Returns `GitBackendError::DetachedHead` when HEAD is not a branch.
    fn current_branch(&self) -> Result<String, GitBackendError>;

    /// Whether a local branch with this name exists.
    ///
    /// # Errors
    ///
    /// Returns an error if references cannot be read.
    fn branch_exists_locally(&self, name: &str) -> Result<bool, GitBackendError>;

    /// Commits reachable from `head` but not from `base`, newest first.
    ///
    /// # Errors
    ///
    /// Returns `GitBackendError::RefNotFound` if either ref cannot be resolved.
    fn list_commits(&self, base: &str, head: &str) -> Result<Vec<CommitInfo>, GitBackendError>;

    /// The repository working directory. `None` for bare repositories.
    fn workdir(&self) -> Option<&Path>;

    // === Mutation ===

    /// Delete a local branch.
    ///
    /// Refuses the checked-out branch. Without `force`, also refuses a branch
    /// that is not merged into HEAD.
    ///
    /// # Errors
    ///
    /// Returns `GitBackendError::BranchCheckedOut` or
    /// `GitBackendError::BranchNotMerged` when refused.
    fn delete_local_branch(&self, name: &str, force: bool) -> Result<(), GitBackendError>;

    /// Fetch `refspec` from `remote`.
    ///
    /// # Errors
    ///
    /// Returns `GitBackendError::CommandFailed` if the fetch fails.
    fn fetch(&self, remote: &str, refspec: &str) -> Result<(), GitBackendError>;

    /// Check out a local branch.
    ///
    /// # Errors
    ///
    /// Returns an error if the branch does not exist or the working tree
    /// conflicts with it.
    fn checkout(&self, name: &str) -> Result<(), GitBackendError>;

    /// Make `branch` track the branch of the same name on `remote`.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be written.
    fn set_upstream(&self, branch: &str, remote: &str) -> Result<(), GitBackendError>;

    // === Derived ===

    /// The remote to talk to the service through.
    ///
    /// # Errors
    ///
    /// Returns `GitBackendError::NoServiceRemote` if no remote points at the
    /// service.
    fn default_service_remote(&self) -> Result<RemoteEntry, GitBackendError> {
        select_service_remote(self.list_remotes()?)
    }
}

/// Pick the service remote named `origin`, else the first service remote.
///
/// # Errors
///
/// Returns `GitBackendError::NoServiceRemote` if no remote points at the
/// service.
pub fn select_service_remote(remotes: Vec<RemoteEntry>) -> Result<RemoteEntry, GitBackendError> {
    let mut service_remotes = remotes
        .into_iter()
        .filter(RemoteEntry::is_service_remote)
        .peekable();

    let first = service_remotes
        .peek()
        .cloned()
        .ok_or(GitBackendError::NoServiceRemote)?;

    Ok(service_remotes
        .find(|remote| remote.name == DEFAULT_REMOTE_NAME)
        .unwrap_or(first))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn remote(name: &str, url: &str) -> RemoteEntry {
        RemoteEntry::new(name, url, url)
    }

    #[test]
    fn test_prefers_origin() {
        let selected = select_service_remote(vec![
            remote("fork", "git@bitbucket.org:me/widgets.git"),
            remote("origin", "git@bitbucket.org:acme/widgets.git"),
        ])
        .unwrap();
        assert_eq!(selected.name, "origin");
    }

    #[test]
    fn test_falls_back_to_first_service_remote() {
        let selected = select_service_remote(vec![
            remote("origin", "git@github.com:acme/widgets.git"),
            remote("bb", "git@bitbucket.org:acme/widgets.git"),
            remote("bb2", "git@bitbucket.org:other/widgets.git"),
        ])
        .unwrap();
        assert_eq!(selected.name, "bb");
    }

    #[test]
    fn test_no_service_remote() {
        let result = select_service_remote(vec![remote("origin", "git@github.com:a/b.git")]);
        assert!(matches!(result, Err(GitBackendError::NoServiceRemote)));
    }
}
