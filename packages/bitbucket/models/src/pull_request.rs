use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

use crate::{Account, AccountRef, Links};

/// A pull request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PullRequest {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub state: PrState,
    pub source: Endpoint,
    pub destination: Endpoint,
    #[serde(default)]
    pub author: Option<Account>,
    #[serde(default)]
    pub reviewers: Vec<Account>,
    #[serde(default)]
    pub participants: Vec<Participant>,
    #[serde(default)]
    pub comment_count: u64,
    #[serde(default)]
    pub close_source_branch: bool,
    #[serde(default)]
    pub created_on: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_on: Option<DateTime<Utc>>,
    #[serde(default)]
    pub links: Links,
}

impl PullRequest {
    /// Name of the branch the changes come from.
    #[must_use]
    pub fn source_branch(&self) -> &str {
        &self.source.branch.name
    }

    /// Name of the branch the changes merge into.
    #[must_use]
    pub fn destination_branch(&self) -> &str {
        &self.destination.branch.name
    }

    /// Participants that approved.
    pub fn approvals(&self) -> impl Iterator<Item = &Participant> {
        self.participants.iter().filter(|p| p.approved)
    }
}

/// Lifecycle state of a pull request.
///
/// OPEN→MERGED is terminal. OPEN→DECLINED→OPEN is permitted.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum PrState {
    Open,
    Merged,
    Declined,
}

/// One side of a pull request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Endpoint {
    pub branch: BranchName,
    #[serde(default)]
    pub commit: Option<CommitRef>,
    #[serde(default)]
    pub repository: Option<RepositoryName>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchName {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitRef {
    pub hash: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryName {
    #[serde(default)]
    pub full_name: String,
}

/// A user's involvement in a pull request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Participant {
    #[serde(default)]
    pub user: Option<Account>,
    pub role: ParticipantRole,
    #[serde(default)]
    pub approved: bool,
    /// `approved`, `changes_requested`, or absent.
    #[serde(default)]
    pub state: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum ParticipantRole {
    Participant,
    Reviewer,
}

/// Merge strategies accepted by the merge endpoint.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum MergeStrategy {
    MergeCommit,
    Squash,
    FastForward,
}

/// A branch reference in a request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointRef {
    pub branch: BranchName,
}

impl EndpointRef {
    #[must_use]
    pub fn branch(name: impl Into<String>) -> Self {
        Self {
            branch: BranchName { name: name.into() },
        }
    }
}

/// Request body for creating a pull request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPullRequest {
    pub title: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    pub source: EndpointRef,
    pub destination: EndpointRef,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub reviewers: Vec<AccountRef>,
}

/// Request body for updating a pull request. Only set fields are sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequestUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<EndpointRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<PrState>,
}

impl PullRequestUpdate {
    /// Whether no field is set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.destination.is_none()
            && self.state.is_none()
    }
}

/// Request body for the merge endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeRequest {
    pub merge_strategy: MergeStrategy,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub close_source_branch: Option<bool>,
}
