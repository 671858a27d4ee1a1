#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Working-copy models for `bkt`.
//!
//! This crate defines the data types returned by working-copy operations,
//! abstracting over the specific git implementation (git2, CLI, fakes).

use bkt_repo_ref::{RepoRef, is_service_url, parse_remote_url};
use serde::{Deserialize, Serialize};

/// A remote configured in the local checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteEntry {
    /// Remote name (e.g. "origin").
    pub name: String,
    /// URL used for fetching.
    pub fetch_url: String,
    /// URL used for pushing. Same as the fetch URL unless `pushurl` is set.
    pub push_url: String,
    /// Parsed repository when either URL points at the service.
    pub repo_ref: Option<RepoRef>,
}

impl RemoteEntry {
    /// Build an entry, attaching the parsed [`RepoRef`] when the fetch URL
    /// (or failing that, the push URL) is a service URL.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        fetch_url: impl Into<String>,
        push_url: impl Into<String>,
    ) -> Self {
        let fetch_url = fetch_url.into();
        let push_url = push_url.into();
        let repo_ref = [&fetch_url, &push_url]
            .into_iter()
            .filter(|url| is_service_url(url))
            .find_map(|url| parse_remote_url(url).ok());

        Self {
            name: name.into(),
            fetch_url,
            push_url,
            repo_ref,
        }
    }

    /// Whether this remote points at the service.
    #[must_use]
    pub const fn is_service_remote(&self) -> bool {
        self.repo_ref.is_some()
    }
}

/// Git commit information.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitInfo {
    /// Full SHA of the commit.
    pub sha: String,
    /// Short SHA (first 7 characters).
    pub short_sha: String,
    /// First line of the commit message.
    pub summary: String,
}

/// Errors from working-copy operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GitBackendError {
    /// The path is not inside a git working copy.
    #[error("not a git repository: {path}")]
    NotAWorkingCopy {
        /// The path that was searched from.
        path: String,
    },

    /// No remote of the checkout points at Bitbucket.
    #[error("no Bitbucket remote found in this repository")]
    NoServiceRemote,

    /// HEAD does not point at a branch.
    #[error("HEAD is detached; check out a branch first")]
    DetachedHead,

    /// Reference (branch, commit) not found.
    #[error("ref not found: {ref_name}")]
    RefNotFound {
        /// The reference name that wasn't found.
        ref_name: String,
    },

    /// The branch is checked out and cannot be deleted or overwritten.
    #[error("cannot delete branch '{branch}' while it is checked out")]
    BranchCheckedOut {
        /// The checked-out branch.
        branch: String,
    },

    /// The branch has commits that are not merged into HEAD.
    #[error("branch '{branch}' is not fully merged")]
    BranchNotMerged {
        /// The branch that was refused.
        branch: String,
    },

    /// A `git` subprocess exited unsuccessfully.
    #[error("`{command}` failed: {message}")]
    CommandFailed {
        /// The command line that was run.
        command: String,
        /// Captured stderr, trimmed.
        message: String,
    },

    /// General git operation error.
    #[error("git operation failed: {message}")]
    GitError {
        /// Error message from the underlying git implementation.
        message: String,
    },

    /// I/O error.
    #[error("I/O error: {message}")]
    IoError {
        /// Error message.
        message: String,
    },
}

impl From<std::io::Error> for GitBackendError {
    fn from(err: std::io::Error) -> Self {
        Self::IoError {
            message: err.to_string(),
        }
    }
}
