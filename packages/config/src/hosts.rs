//! `hosts.json`: the active user per service host.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;
use crate::file::read_json;

pub const HOSTS_FILE: &str = "hosts.json";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostEntry {
    /// Username the credential store entry is keyed under.
    #[serde(default)]
    pub user: Option<String>,
}

/// Map of host name to its entry, e.g. `{"bitbucket.org": {"user": "alice"}}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HostsConfig {
    hosts: BTreeMap<String, HostEntry>,
}

impl HostsConfig {
    /// Load `hosts.json` from `dir`. A missing file yields an empty map.
    ///
    /// # Errors
    ///
    /// * [`ConfigError::Io`] or [`ConfigError::Parse`] on a broken file.
    pub fn load(dir: &Path) -> Result<Self, ConfigError> {
        read_json(&dir.join(HOSTS_FILE)).map(Option::unwrap_or_default)
    }

    #[must_use]
    pub fn active_user(&self, host: &str) -> Option<&str> {
        self.hosts
            .get(host)
            .and_then(|entry| entry.user.as_deref())
            .filter(|user| !user.is_empty())
    }

    pub fn set_active_user(&mut self, host: impl Into<String>, user: impl Into<String>) {
        self.hosts.insert(
            host.into(),
            HostEntry {
                user: Some(user.into()),
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_active_user() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(HOSTS_FILE),
            r#"{"bitbucket.org": {"user": "alice", "git_protocol": "ssh"}}"#,
        )
        .unwrap();

        let hosts = HostsConfig::load(dir.path()).unwrap();
        assert_eq!(hosts.active_user("bitbucket.org"), Some("alice"));
        assert_eq!(hosts.active_user("example.com"), None);
    }

    #[test]
    fn test_missing_hosts_file() {
        let dir = tempfile::tempdir().unwrap();
        let hosts = HostsConfig::load(dir.path()).unwrap();
        assert_eq!(hosts.active_user("bitbucket.org"), None);
    }
}
