use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Mutex;

use bkt_git_backend::{CommitInfo, GitBackendError, GitRepository, RemoteEntry};

/// A mutating call made against a [`FakeGitRepository`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GitCall {
    Fetch { remote: String, refspec: String },
    DeleteBranch { name: String, force: bool },
    Checkout { name: String },
    SetUpstream { branch: String, remote: String },
}

#[derive(Debug, Default)]
struct State {
    current_branch: Option<String>,
    local_branches: BTreeSet<String>,
    calls: Vec<GitCall>,
}

/// An in-memory working copy.
///
/// Mutations update the fake's state the way git would (checkout moves the
/// current branch, fetch with `a:b` creates `b`) and are recorded in order.
#[derive(Debug, Default)]
pub struct FakeGitRepository {
    remotes: Vec<RemoteEntry>,
    commits: Vec<CommitInfo>,
    fail_upstream: bool,
    state: Mutex<State>,
}

impl FakeGitRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a remote whose fetch and push URL are `url`.
    #[must_use]
    pub fn with_remote(mut self, name: &str, url: &str) -> Self {
        self.remotes.push(RemoteEntry::new(name, url, url));
        self
    }

    /// Check out `name`, creating it locally.
    #[must_use]
    pub fn on_branch(self, name: &str) -> Self {
        {
            let mut state = self.lock();
            state.current_branch = Some(name.to_string());
            state.local_branches.insert(name.to_string());
        }
        self
    }

    #[must_use]
    pub fn with_local_branch(self, name: &str) -> Self {
        self.lock().local_branches.insert(name.to_string());
        self
    }

    /// Commit subjects returned by `list_commits`, newest first.
    #[must_use]
    pub fn with_commits(mut self, subjects: &[&str]) -> Self {
        self.commits = subjects
            .iter()
            .enumerate()
            .map(|(i, subject)| {
                let sha = format!("{i:040x}");
                CommitInfo {
                    short_sha: sha[..7].to_string(),
                    sha,
                    summary: (*subject).to_string(),
                }
            })
            .collect();
        self
    }

    /// Make `set_upstream` fail.
    #[must_use]
    pub fn failing_upstream(mut self) -> Self {
        self.fail_upstream = true;
        self
    }

    #[must_use]
    pub fn calls(&self) -> Vec<GitCall> {
        self.lock().calls.clone()
    }

    #[must_use]
    pub fn fetches(&self) -> Vec<GitCall> {
        self.calls()
            .into_iter()
            .filter(|call| matches!(call, GitCall::Fetch { .. }))
            .collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, State> {
        self.state
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl GitRepository for FakeGitRepository {
    fn list_remotes(&self) -> Result<Vec<RemoteEntry>, GitBackendError> {
        Ok(self.remotes.clone())
    }

    fn current_branch(&self) -> Result<String, GitBackendError> {
        self.lock()
            .current_branch
            .clone()
            .ok_or(GitBackendError::DetachedHead)
    }

    fn branch_exists_locally(&self, name: &str) -> Result<bool, GitBackendError> {
        Ok(self.lock().local_branches.contains(name))
    }

    fn list_commits(&self, base: &str, _head: &str) -> Result<Vec<CommitInfo>, GitBackendError> {
        if base.contains('/') || self.lock().local_branches.contains(base) {
            Ok(self.commits.clone())
        } else {
            Err(GitBackendError::RefNotFound {
                ref_name: base.to_string(),
            })
        }
    }

    fn workdir(&self) -> Option<&Path> {
        None
    }

    fn delete_local_branch(&self, name: &str, force: bool) -> Result<(), GitBackendError> {
        let mut state = self.lock();
        if state.current_branch.as_deref() == Some(name) {
            return Err(GitBackendError::BranchCheckedOut {
                branch: name.to_string(),
            });
        }
        if !state.local_branches.remove(name) {
            return Err(GitBackendError::RefNotFound {
                ref_name: name.to_string(),
            });
        }
        state.calls.push(GitCall::DeleteBranch {
            name: name.to_string(),
            force,
        });
        Ok(())
    }

    fn fetch(&self, remote: &str, refspec: &str) -> Result<(), GitBackendError> {
        let mut state = self.lock();
        if let Some((_, dst)) = refspec.split_once(':') {
            state.local_branches.insert(dst.to_string());
        }
        state.calls.push(GitCall::Fetch {
            remote: remote.to_string(),
            refspec: refspec.to_string(),
        });
        Ok(())
    }

    fn checkout(&self, name: &str) -> Result<(), GitBackendError> {
        let mut state = self.lock();
        if !state.local_branches.contains(name) {
            return Err(GitBackendError::RefNotFound {
                ref_name: name.to_string(),
            });
        }
        state.current_branch = Some(name.to_string());
        state.calls.push(GitCall::Checkout {
            name: name.to_string(),
        });
        Ok(())
    }

    fn set_upstream(&self, branch: &str, remote: &str) -> Result<(), GitBackendError> {
        if self.fail_upstream {
            return Err(GitBackendError::GitError {
                message: format!("cannot track {remote}/{branch}"),
            });
        }
        self.lock().calls.push(GitCall::SetUpstream {
            branch: branch.to_string(),
            remote: remote.to_string(),
        });
        Ok(())
    }
}
