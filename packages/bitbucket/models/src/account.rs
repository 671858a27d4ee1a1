use serde::{Deserialize, Serialize};

/// A user account as embedded in other resources.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    #[serde(default)]
    pub uuid: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub nickname: Option<String>,
    #[serde(default)]
    pub account_id: Option<String>,
}

impl Account {
    /// Best human-readable name for the account.
    #[must_use]
    pub fn name(&self) -> &str {
        self.nickname
            .as_deref()
            .or(self.display_name.as_deref())
            .unwrap_or("unknown")
    }

    /// Whether `name` refers to this account (nickname, account id or display
    /// name, compared case-insensitively).
    #[must_use]
    pub fn matches(&self, name: &str) -> bool {
        [&self.nickname, &self.account_id, &self.display_name]
            .into_iter()
            .flatten()
            .any(|candidate| candidate.eq_ignore_ascii_case(name))
    }
}

/// Reference to an account by UUID, as sent in request bodies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountRef {
    pub uuid: String,
}

/// An entry of `/workspaces/{workspace}/members`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkspaceMembership {
    pub user: Account,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_any_identifier_case_insensitively() {
        let account = Account {
            uuid: Some("{1}".to_string()),
            display_name: Some("Jane Doe".to_string()),
            nickname: Some("jdoe".to_string()),
            account_id: Some("557058:abc".to_string()),
        };

        assert!(account.matches("JDoe"));
        assert!(account.matches("jane doe"));
        assert!(account.matches("557058:abc"));
        assert!(!account.matches("john"));
        assert_eq!(account.name(), "jdoe");
    }
}
