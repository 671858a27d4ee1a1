#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Bitbucket Cloud REST API models for `bkt`.
//!
//! Each schema carries only the fields `bkt` consumes. Unknown fields are
//! ignored on decode and optional fields default, so the service can grow its
//! payloads without breaking parsing.

pub mod account;
pub mod branch;
pub mod comment;
pub mod page;
pub mod project;
pub mod pull_request;
pub mod repository;
pub mod status;

pub use account::{Account, AccountRef, WorkspaceMembership};
pub use branch::{Branch, BranchTarget};
pub use comment::{Comment, CommentContent, NewComment};
pub use page::Page;
pub use project::{NewProject, Project};
pub use pull_request::{
    BranchName, CommitRef, Endpoint, EndpointRef, MergeRequest, MergeStrategy, NewPullRequest,
    Participant, ParticipantRole, PrState, PullRequest, PullRequestUpdate, RepositoryName,
};
pub use repository::Repository;
pub use status::{CommitStatus, CommitStatusState};

use serde::{Deserialize, Serialize};

/// A hyperlink in a `links` object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub href: String,
}

/// The `links` object shared by most resources.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Links {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html: Option<Link>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diff: Option<Link>,
}

impl Links {
    /// The HTML link, if the service returned one.
    #[must_use]
    pub fn html_href(&self) -> Option<&str> {
        self.html.as_ref().map(|link| link.href.as_str())
    }

    /// The diff link, if the service returned one.
    #[must_use]
    pub fn diff_href(&self) -> Option<&str> {
        self.diff.as_ref().map(|link| link.href.as_str())
    }
}
