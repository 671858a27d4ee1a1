//! Pull-request selector resolution.

use std::sync::LazyLock;

use bkt_bitbucket::BitbucketClient;
use bkt_git_backend::GitRepository;
use bkt_repo_ref::{RepoRef, SERVICE_HOST};
use regex::Regex;

use crate::ContextError;

static PULL_REQUEST_PATH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/pull-requests/([0-9]+)").expect("valid regex"));

/// What the user typed to pick a pull request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrSelector {
    /// Nothing: use the working copy's current branch.
    CurrentBranch,
    Number(u64),
    Branch(String),
}

impl PrSelector {
    /// Classify a selector. Cases are checked in order: empty, number
    /// (optionally `#`-prefixed), service URL, branch name.
    ///
    /// # Errors
    ///
    /// * [`ContextError::InvalidPRNumber`] for zero or an out-of-range number.
    /// * [`ContextError::UnrecognizedURL`] for a service URL without a
    ///   pull-request path.
    pub fn parse(selector: Option<&str>) -> Result<Self, ContextError> {
        let selector = selector.map(str::trim).unwrap_or_default();
        if selector.is_empty() {
            return Ok(Self::CurrentBranch);
        }

        let digits = selector.strip_prefix('#').unwrap_or(selector);
        if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
            return match digits.parse::<u64>() {
                Ok(id) if id > 0 => Ok(Self::Number(id)),
                _ => Err(ContextError::InvalidPRNumber {
                    value: selector.to_string(),
                }),
            };
        }

        if selector.contains(SERVICE_HOST) {
            return PULL_REQUEST_PATH
                .captures(selector)
                .and_then(|caps| caps[1].parse::<u64>().ok())
                .filter(|id| *id > 0)
                .map(Self::Number)
                .ok_or_else(|| ContextError::UnrecognizedURL {
                    url: selector.to_string(),
                });
        }

        Ok(Self::Branch(selector.to_string()))
    }
}

/// Map a selector to a pull-request id.
///
/// Numbers and URLs resolve without contacting the service. Branch names,
/// and the current branch when the selector is empty, are looked up as the
/// first open pull request from that branch.
///
/// # Errors
///
/// * Any [`PrSelector::parse`] error.
/// * [`ContextError::WorkingCopy`] if the current branch cannot be read.
/// * [`ContextError::NoPRForCurrentBranch`] when the search is empty.
/// * [`ContextError::Api`] on service failure.
pub async fn resolve_pr_selector(
    client: &BitbucketClient,
    repo: &RepoRef,
    selector: Option<&str>,
    working_copy: Option<&dyn GitRepository>,
) -> Result<u64, ContextError> {
    let branch = match PrSelector::parse(selector)? {
        PrSelector::Number(id) => return Ok(id),
        PrSelector::Branch(branch) => branch,
        PrSelector::CurrentBranch => {
            let working_copy = working_copy.ok_or_else(|| ContextError::Undetected {
                source: bkt_git_backend::GitBackendError::NotAWorkingCopy {
                    path: ".".to_string(),
                },
            })?;
            working_copy.current_branch()?
        }
    };

    log::debug!("Searching for an open pull request from {branch}");
    client
        .find_open_pull_request(repo, &branch)
        .await?
        .map(|pr| pr.id)
        .ok_or(ContextError::NoPRForCurrentBranch { branch })
}
