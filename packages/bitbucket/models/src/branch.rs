use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A branch of a repository (`/refs/branches`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Branch {
    pub name: String,
    pub target: BranchTarget,
}

/// The commit a branch points at.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BranchTarget {
    pub hash: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
}
