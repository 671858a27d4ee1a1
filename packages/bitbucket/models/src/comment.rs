use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Account, Links};

/// A comment on a pull request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: u64,
    pub content: CommentContent,
    #[serde(default)]
    pub links: Links,
    #[serde(default)]
    pub user: Option<Account>,
    #[serde(default)]
    pub created_on: Option<DateTime<Utc>>,
}

/// Rendered and raw comment text. Only the raw markup is consumed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentContent {
    #[serde(default)]
    pub raw: String,
}

/// Request body for posting a comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewComment {
    pub content: CommentContent,
}

impl NewComment {
    #[must_use]
    pub fn new(body: impl Into<String>) -> Self {
        Self {
            content: CommentContent { raw: body.into() },
        }
    }
}
