#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Pull-request operations for `bkt`.
//!
//! [`PrOperations`] composes the REST client, the selector resolver and the
//! working copy into the user-visible commands. Each operation returns an
//! [`Outcome`] carrying its result and any non-fatal warnings; printing is
//! left to the caller.

mod checkout;
mod checks;
mod comment;
mod create;
mod diff;
mod edit;
mod error;
mod list;
mod merge;
mod review;
mod state;
mod view;

pub use checkout::CheckoutResult;
pub use checks::status_symbol;
pub use comment::CommentResult;
pub use create::{CreateOptions, DRAFT_PREFIX, PROTECTED_BRANCHES, source_branch};
pub use diff::colorize_diff;
pub use edit::EditOptions;
pub use error::PrError;
pub use list::ListOptions;
pub use merge::{MergeOptions, MergeResult};
pub use review::{ReviewAction, ReviewOptions};

use bkt_bitbucket::BitbucketClient;
use bkt_context::resolve_pr_selector;
use bkt_git_backend::GitRepository;
use bkt_repo_ref::RepoRef;
use bkt_terminal::{Prompter, TextEditor};

/// A result plus warnings to show the user.
#[derive(Debug, Clone)]
pub struct Outcome<T> {
    pub value: T,
    pub warnings: Vec<String>,
}

impl<T> Outcome<T> {
    #[must_use]
    pub const fn new(value: T) -> Self {
        Self {
            value,
            warnings: Vec::new(),
        }
    }

    /// Record a warning for the caller to show.
    pub fn warn(&mut self, warning: impl Into<String>) {
        let warning = warning.into();
        log::debug!("warning: {warning}");
        self.warnings.push(warning);
    }
}

/// Pull-request commands against one repository.
pub struct PrOperations<'a> {
    client: &'a BitbucketClient,
    repo: &'a RepoRef,
    working_copy: Option<&'a dyn GitRepository>,
    prompter: &'a dyn Prompter,
    editor: &'a dyn TextEditor,
}

impl<'a> PrOperations<'a> {
    #[must_use]
    pub fn new(
        client: &'a BitbucketClient,
        repo: &'a RepoRef,
        working_copy: Option<&'a dyn GitRepository>,
        prompter: &'a dyn Prompter,
        editor: &'a dyn TextEditor,
    ) -> Self {
        Self {
            client,
            repo,
            working_copy,
            prompter,
            editor,
        }
    }

    /// Resolve a selector to a pull-request id.
    ///
    /// # Errors
    ///
    /// Any selector resolution error.
    pub async fn resolve(&self, selector: Option<&str>) -> Result<u64, PrError> {
        Ok(resolve_pr_selector(self.client, self.repo, selector, self.working_copy).await?)
    }

    fn working_copy(&self) -> Result<&'a dyn GitRepository, PrError> {
        self.working_copy.ok_or(PrError::NoWorkingCopy)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use bkt_bitbucket::BitbucketClient;
    use bkt_repo_ref::RepoRef;
    use wiremock::MockServer;

    pub fn repo() -> RepoRef {
        RepoRef::new("acme", "widgets")
    }

    pub fn client(server: &MockServer) -> BitbucketClient {
        BitbucketClient::new("tok")
            .unwrap()
            .with_base_url(server.uri())
    }

    pub const PRS: &str = "/repositories/acme/widgets/pullrequests";
}
