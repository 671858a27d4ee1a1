#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Bearer-token discovery for `bkt`.
//!
//! Tokens come from `BKT_TOKEN` first, then from the credential store entry
//! of the host's active user in `hosts.json`.

mod store;

pub use store::{CredentialStore, KeyringStore};

use bkt_config::{BKT_TOKEN, Environment, HostsConfig};
use bkt_repo_ref::SERVICE_HOST;
use serde::Deserialize;

/// Errors from resolving a credential.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("not logged in to {host}; set {BKT_TOKEN} or store a credential for {host}")]
    NotLoggedIn { host: String },

    #[error("credential store unavailable: {message}")]
    CredentialStoreUnavailable { message: String },
}

/// Where a credential came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialSource {
    Env,
    Store,
}

/// A bearer token. Never persisted.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    token: String,
    source: CredentialSource,
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("token", &"<redacted>")
            .field("source", &self.source)
            .finish()
    }
}

impl Credential {
    /// Wrap a raw secret, unwrapping an OAuth `{"access_token": ...}` envelope.
    #[must_use]
    pub fn from_secret(secret: &str, source: CredentialSource) -> Self {
        Self {
            token: unwrap_oauth_envelope(secret.trim()),
            source,
        }
    }

    #[must_use]
    pub fn token(&self) -> &str {
        &self.token
    }

    #[must_use]
    pub const fn source(&self) -> CredentialSource {
        self.source
    }
}

#[derive(Deserialize)]
struct OAuthEnvelope {
    access_token: Option<String>,
}

fn unwrap_oauth_envelope(secret: &str) -> String {
    match serde_json::from_str::<OAuthEnvelope>(secret) {
        Ok(OAuthEnvelope {
            access_token: Some(token),
        }) if !token.is_empty() => token,
        _ => secret.to_string(),
    }
}

/// Probes the environment, then the credential store.
pub struct CredentialResolver<'a> {
    env: &'a Environment,
    hosts: &'a HostsConfig,
    store: &'a dyn CredentialStore,
    host: &'a str,
}

impl<'a> CredentialResolver<'a> {
    #[must_use]
    pub fn new(env: &'a Environment, hosts: &'a HostsConfig, store: &'a dyn CredentialStore) -> Self {
        Self {
            env,
            hosts,
            store,
            host: SERVICE_HOST,
        }
    }

    /// Resolve the credential for the service host.
    ///
    /// # Errors
    ///
    /// * [`AuthError::NotLoggedIn`] when no source yields a token.
    /// * [`AuthError::CredentialStoreUnavailable`] when the store cannot be
    ///   queried.
    pub fn resolve(&self) -> Result<Credential, AuthError> {
        if let Some(token) = self.env.get(BKT_TOKEN) {
            log::debug!("Using token from {BKT_TOKEN}");
            return Ok(Credential::from_secret(token, CredentialSource::Env));
        }

        let not_logged_in = || AuthError::NotLoggedIn {
            host: self.host.to_string(),
        };

        let user = self.hosts.active_user(self.host).ok_or_else(not_logged_in)?;
        log::debug!("Looking up stored credential for {user}@{}", self.host);

        match self.store.get(self.host, user)? {
            Some(secret) if !secret.trim().is_empty() => {
                Ok(Credential::from_secret(&secret, CredentialSource::Store))
            }
            _ => Err(not_logged_in()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    struct MapStore {
        secret: Option<String>,
        lookups: RefCell<Vec<(String, String)>>,
    }

    impl MapStore {
        fn with(secret: Option<&str>) -> Self {
            Self {
                secret: secret.map(ToString::to_string),
                lookups: RefCell::new(Vec::new()),
            }
        }
    }

    impl CredentialStore for MapStore {
        fn get(&self, host: &str, user: &str) -> Result<Option<String>, AuthError> {
            self.lookups
                .borrow_mut()
                .push((host.to_string(), user.to_string()));
            Ok(self.secret.clone())
        }
    }

    struct BrokenStore;

    impl CredentialStore for BrokenStore {
        fn get(&self, _host: &str, _user: &str) -> Result<Option<String>, AuthError> {
            Err(AuthError::CredentialStoreUnavailable {
                message: "no helper".to_string(),
            })
        }
    }

    fn hosts_with_alice() -> HostsConfig {
        let mut hosts = HostsConfig::default();
        hosts.set_active_user("bitbucket.org", "alice");
        hosts
    }

    #[test]
    fn test_env_token_wins_without_store_lookup() {
        let env = Environment::from_pairs([(BKT_TOKEN, "env-token")]);
        let hosts = hosts_with_alice();
        let store = MapStore::with(Some("stored"));

        let credential = CredentialResolver::new(&env, &hosts, &store).resolve().unwrap();
        assert_eq!(credential.token(), "env-token");
        assert_eq!(credential.source(), CredentialSource::Env);
        assert!(store.lookups.borrow().is_empty());
    }

    #[test]
    fn test_store_lookup_uses_active_user() {
        let env = Environment::default();
        let hosts = hosts_with_alice();
        let store = MapStore::with(Some("stored-token"));

        let credential = CredentialResolver::new(&env, &hosts, &store).resolve().unwrap();
        assert_eq!(credential.token(), "stored-token");
        assert_eq!(credential.source(), CredentialSource::Store);
        assert_eq!(
            store.lookups.borrow().as_slice(),
            [("bitbucket.org".to_string(), "alice".to_string())]
        );
    }

    #[test]
    fn test_oauth_envelope_is_unwrapped() {
        let credential = Credential::from_secret(
            r#"{"access_token": "inner", "refresh_token": "r"}"#,
            CredentialSource::Store,
        );
        assert_eq!(credential.token(), "inner");
    }

    #[test]
    fn test_envelope_without_access_token_is_verbatim() {
        let raw = r#"{"access_token": ""}"#;
        assert_eq!(Credential::from_secret(raw, CredentialSource::Env).token(), raw);
        assert_eq!(
            Credential::from_secret("plain", CredentialSource::Env).token(),
            "plain"
        );
    }

    #[test]
    fn test_no_active_user_is_not_logged_in() {
        let env = Environment::default();
        let hosts = HostsConfig::default();
        let store = MapStore::with(Some("unused"));

        let err = CredentialResolver::new(&env, &hosts, &store)
            .resolve()
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "not logged in to bitbucket.org; set BKT_TOKEN or store a credential for bitbucket.org"
        );
    }

    #[test]
    fn test_store_failure_propagates() {
        let env = Environment::default();
        let hosts = hosts_with_alice();

        assert!(matches!(
            CredentialResolver::new(&env, &hosts, &BrokenStore).resolve(),
            Err(AuthError::CredentialStoreUnavailable { .. })
        ));
    }

    #[test]
    fn test_debug_redacts_token() {
        let credential = Credential::from_secret("s3cret", CredentialSource::Env);
        assert!(!format!("{credential:?}").contains("s3cret"));
    }
}
