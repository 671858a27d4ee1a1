#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Decides which repository and which pull request a command targets.
//!
//! [`RepoContextResolver`] applies the fixed precedence of `--repo` flag,
//! configured default workspace, then the working copy's service remote.
//! [`resolve_pr_selector`] maps a number, URL, branch name or nothing at all
//! to a pull-request id.

mod repo;
mod selector;

pub use repo::{RepoContextResolver, parse_repo_flag};
pub use selector::{PrSelector, resolve_pr_selector};

use bkt_bitbucket::BitbucketError;
use bkt_git_backend::GitBackendError;

const REPO_HINT: &str = "use --repo WORKSPACE/REPO";

#[derive(Debug, thiserror::Error)]
pub enum ContextError {
    #[error("invalid repository \"{value}\"; {REPO_HINT}")]
    MalformedRepoFlag { value: String },

    /// The working copy could not supply a repository.
    #[error("{source}; {REPO_HINT}")]
    Undetected {
        #[source]
        source: GitBackendError,
    },

    /// No workspace from flag, config or working copy.
    #[error("no workspace given; use --repo WORKSPACE or set default_workspace")]
    NoWorkspace,

    #[error("no open pull request found for branch \"{branch}\"")]
    NoPRForCurrentBranch { branch: String },

    #[error("invalid pull request number \"{value}\"")]
    InvalidPRNumber { value: String },

    #[error("unrecognized pull request URL: {url}")]
    UnrecognizedURL { url: String },

    #[error(transparent)]
    WorkingCopy(#[from] GitBackendError),

    #[error(transparent)]
    Api(#[from] BitbucketError),
}
