#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! git2 (libgit2) implementation of the `GitBackend` trait.
//!
//! Local inspection and mutation go through libgit2. Fetching shells out to
//! the `git` binary so the user's transports and credential helpers apply.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use bkt_git_backend::{GitBackend, GitRepository};
use bkt_git_backend_models::{CommitInfo, GitBackendError, RemoteEntry};
use git2::{BranchType, ConfigLevel, ErrorCode, Repository, build::CheckoutBuilder};

/// git2-based implementation of `GitBackend`.
#[derive(Debug, Clone, Default)]
pub struct Git2Backend;

impl Git2Backend {
    /// Create a new git2 backend.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl GitBackend for Git2Backend {
    fn discover(&self, path: &Path) -> Result<Box<dyn GitRepository>, GitBackendError> {
        let repo = Repository::discover(path).map_err(|e| {
            log::debug!("No repository found from {}: {e}", path.display());
            GitBackendError::NotAWorkingCopy {
                path: path.display().to_string(),
            }
        })?;
        Ok(Box::new(Git2Repository::new(repo)))
    }
}

/// git2-based implementation of `GitRepository`.
struct Git2Repository {
    repo: Repository,
    workdir: Option<PathBuf>,
}

fn git_error(err: &git2::Error) -> GitBackendError {
    GitBackendError::GitError {
        message: err.message().to_string(),
    }
}

impl Git2Repository {
    fn new(repo: Repository) -> Self {
        let workdir = repo.workdir().map(Path::to_path_buf);
        Self { repo, workdir }
    }

    fn resolve_to_commit(&self, spec: &str) -> Result<git2::Commit<'_>, GitBackendError> {
        let not_found = || GitBackendError::RefNotFound {
            ref_name: spec.to_string(),
        };

        self.repo
            .revparse_single(spec)
            .map_err(|_| not_found())?
            .peel_to_commit()
            .map_err(|_| not_found())
    }

    fn commit_to_info(commit: &git2::Commit<'_>) -> CommitInfo {
        let sha = commit.id().to_string();
        let short_sha = sha[..sha.len().min(7)].to_string();
        let summary = commit.summary().unwrap_or("").to_string();

        CommitInfo {
            sha,
            short_sha,
            summary,
        }
    }

    fn command_dir(&self) -> &Path {
        self.workdir.as_deref().unwrap_or_else(|| self.repo.path())
    }
}

impl GitRepository for Git2Repository {
    fn list_remotes(&self) -> Result<Vec<RemoteEntry>, GitBackendError> {
        let names = self.repo.remotes().map_err(|e| git_error(&e))?;
        let mut entries = Vec::with_capacity(names.len());

        for name in names.iter().flatten() {
            let remote = self.repo.find_remote(name).map_err(|e| git_error(&e))?;
            let fetch_url = remote.url().unwrap_or_default().to_string();
            let push_url = remote
                .pushurl()
                .map_or_else(|| fetch_url.clone(), ToString::to_string);

            entries.push(RemoteEntry::new(name, fetch_url, push_url));
        }

        Ok(entries)
    }

    fn current_branch(&self) -> Result<String, GitBackendError> {
        match self.repo.head() {
            Ok(head) if head.is_branch() => head
                .shorthand()
                .map(ToString::to_string)
                .ok_or(GitBackendError::DetachedHead),
            Ok(_) => Err(GitBackendError::DetachedHead),
            Err(e) if e.code() == ErrorCode::UnbornBranch => {
                // No commits yet: HEAD still names the branch symbolically.
                let head = self
                    .repo
                    .find_reference("HEAD")
                    .map_err(|e| git_error(&e))?;
                head.symbolic_target()
                    .and_then(|target| target.strip_prefix("refs/heads/"))
                    .map(ToString::to_string)
                    .ok_or(GitBackendError::DetachedHead)
            }
            Err(e) => Err(git_error(&e)),
        }
    }

    fn branch_exists_locally(&self, name: &str) -> Result<bool, GitBackendError> {
        match self.repo.find_branch(name, BranchType::Local) {
            Ok(_) => Ok(true),
            Err(e) if e.code() == ErrorCode::NotFound => Ok(false),
            Err(e) => Err(git_error(&e)),
        }
    }

    fn list_commits(&self, base: &str, head: &str) -> Result<Vec<CommitInfo>, GitBackendError> {
        let base_oid = self.resolve_to_commit(base)?.id();
        let head_oid = self.resolve_to_commit(head)?.id();

        let mut revwalk = self.repo.revwalk().map_err(|e| git_error(&e))?;
        revwalk.push(head_oid).map_err(|e| git_error(&e))?;
        revwalk.hide(base_oid).map_err(|e| git_error(&e))?;

        let mut commits = Vec::new();
        for oid_result in revwalk {
            let oid = oid_result.map_err(|e| git_error(&e))?;
            let commit = self.repo.find_commit(oid).map_err(|e| git_error(&e))?;
            commits.push(Self::commit_to_info(&commit));
        }

        Ok(commits)
    }

    fn workdir(&self) -> Option<&Path> {
        self.workdir.as_deref()
    }

    fn delete_local_branch(&self, name: &str, force: bool) -> Result<(), GitBackendError> {
        if self.current_branch().ok().as_deref() == Some(name) {
            return Err(GitBackendError::BranchCheckedOut {
                branch: name.to_string(),
            });
        }

        let mut branch = self
            .repo
            .find_branch(name, BranchType::Local)
            .map_err(|_| GitBackendError::RefNotFound {
                ref_name: name.to_string(),
            })?;

        if !force {
            let tip = branch
                .get()
                .peel_to_commit()
                .map_err(|e| git_error(&e))?
                .id();
            let head = self
                .repo
                .head()
                .and_then(|head| head.peel_to_commit())
                .map_err(|e| git_error(&e))?
                .id();

            let merged = tip == head
                || self
                    .repo
                    .graph_descendant_of(head, tip)
                    .map_err(|e| git_error(&e))?;
            if !merged {
                return Err(GitBackendError::BranchNotMerged {
                    branch: name.to_string(),
                });
            }
        }

        log::debug!("Deleting local branch {name}");
        branch.delete().map_err(|e| git_error(&e))
    }

    fn fetch(&self, remote: &str, refspec: &str) -> Result<(), GitBackendError> {
        let command_line = format!("git fetch {remote} {refspec}");
        log::debug!("Running {command_line}");

        let output = Command::new("git")
            .args(["fetch", remote, refspec])
            .current_dir(self.command_dir())
            .stdin(Stdio::inherit())
            .output()?;

        if !output.status.success() {
            return Err(GitBackendError::CommandFailed {
                command: command_line,
                message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(())
    }

    fn checkout(&self, name: &str) -> Result<(), GitBackendError> {
        let refname = format!("refs/heads/{name}");
        let target = self
            .repo
            .revparse_single(&refname)
            .map_err(|_| GitBackendError::RefNotFound {
                ref_name: name.to_string(),
            })?;

        self.repo
            .checkout_tree(&target, Some(CheckoutBuilder::new().safe()))
            .map_err(|e| git_error(&e))?;
        self.repo.set_head(&refname).map_err(|e| git_error(&e))?;

        log::debug!("Checked out {name}");
        Ok(())
    }

    fn set_upstream(&self, branch: &str, remote: &str) -> Result<(), GitBackendError> {
        let mut config = self
            .repo
            .config()
            .and_then(|config| config.open_level(ConfigLevel::Local))
            .map_err(|e| git_error(&e))?;

        config
            .set_str(&format!("branch.{branch}.remote"), remote)
            .map_err(|e| git_error(&e))?;
        config
            .set_str(
                &format!("branch.{branch}.merge"),
                &format!("refs/heads/{branch}"),
            )
            .map_err(|e| git_error(&e))?;

        Ok(())
    }
}
