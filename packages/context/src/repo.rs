//! Repository-context resolution.

use bkt_git_backend::{GitBackendError, GitRepository};
use bkt_repo_ref::RepoRef;

use crate::ContextError;

/// Parse `WORKSPACE/REPO`, splitting on the first `/`.
///
/// # Errors
///
/// * [`ContextError::MalformedRepoFlag`] if either half is empty.
pub fn parse_repo_flag(value: &str) -> Result<RepoRef, ContextError> {
    match value.split_once('/') {
        Some((workspace, repo)) if !workspace.is_empty() && !repo.is_empty() => {
            Ok(RepoRef::new(workspace, repo))
        }
        _ => Err(ContextError::MalformedRepoFlag {
            value: value.to_string(),
        }),
    }
}

/// Resolves the target repository or workspace of a command.
pub struct RepoContextResolver<'a> {
    default_workspace: Option<&'a str>,
    working_copy: Result<&'a dyn GitRepository, &'a GitBackendError>,
}

impl<'a> RepoContextResolver<'a> {
    /// `working_copy` is the opened checkout, or why none could be opened.
    #[must_use]
    pub fn new(
        default_workspace: Option<&'a str>,
        working_copy: Result<&'a dyn GitRepository, &'a GitBackendError>,
    ) -> Self {
        Self {
            default_workspace: default_workspace.filter(|ws| !ws.is_empty()),
            working_copy,
        }
    }

    /// Resolve the repository for repository-scoped commands.
    ///
    /// A non-empty `flag` wins and the working copy is never consulted.
    ///
    /// # Errors
    ///
    /// * [`ContextError::MalformedRepoFlag`] for a flag without two halves.
    /// * [`ContextError::Undetected`] when the working copy has no service
    ///   remote or there is no working copy.
    pub fn resolve_repo(&self, flag: Option<&str>) -> Result<RepoRef, ContextError> {
        if let Some(flag) = flag.filter(|f| !f.is_empty()) {
            return parse_repo_flag(flag);
        }
        self.detect()
    }

    /// Resolve the workspace for workspace-scoped commands.
    ///
    /// The flag may name a bare workspace or `WORKSPACE/REPO`. Without a flag
    /// the configured default workspace is used before the working copy.
    ///
    /// # Errors
    ///
    /// * [`ContextError::MalformedRepoFlag`] for a flag like `/repo`.
    /// * [`ContextError::NoWorkspace`] when nothing supplies a workspace.
    pub fn resolve_workspace(&self, flag: Option<&str>) -> Result<String, ContextError> {
        if let Some(flag) = flag.filter(|f| !f.is_empty()) {
            if flag.contains('/') {
                return parse_repo_flag(flag).map(|repo| repo.workspace);
            }
            return Ok(flag.to_string());
        }

        if let Some(workspace) = self.default_workspace {
            return Ok(workspace.to_string());
        }

        self.detect()
            .map(|repo| repo.workspace)
            .map_err(|e| {
                log::debug!("Workspace detection failed: {e}");
                ContextError::NoWorkspace
            })
    }

    fn detect(&self) -> Result<RepoRef, ContextError> {
        let undetected = |source: GitBackendError| ContextError::Undetected { source };

        let working_copy = self.working_copy.map_err(|e| undetected(e.clone()))?;

        let remote = working_copy.default_service_remote().map_err(undetected)?;
        log::debug!("Using repository from remote '{}'", remote.name);

        remote
            .repo_ref
            .ok_or_else(|| undetected(GitBackendError::NoServiceRemote))
    }
}
