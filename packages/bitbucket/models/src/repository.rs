use serde::{Deserialize, Serialize};

use crate::{BranchName, Links};

/// A repository (`/repositories/{workspace}/{repo}`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Repository {
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub mainbranch: Option<BranchName>,
    #[serde(default)]
    pub is_private: bool,
    #[serde(default)]
    pub links: Links,
}
