//! OS credential store access.

use crate::AuthError;

/// Secret lookup keyed by `(host, user)`.
pub trait CredentialStore {
    /// The stored secret, or `None` when there is no entry.
    ///
    /// # Errors
    ///
    /// * [`AuthError::CredentialStoreUnavailable`] if the store cannot be
    ///   queried at all.
    fn get(&self, host: &str, user: &str) -> Result<Option<String>, AuthError>;
}

/// Reads secrets from the platform keyring (Keychain, Windows Credential
/// Manager, kernel keyutils). Entries use the host as service name and the
/// account name as user.
#[derive(Debug, Clone, Default)]
pub struct KeyringStore;

impl KeyringStore {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

fn unavailable(err: &keyring::Error) -> AuthError {
    AuthError::CredentialStoreUnavailable {
        message: err.to_string(),
    }
}

/// A missing entry is not an error; anything else means the store is broken.
fn entry_secret(result: Result<String, keyring::Error>) -> Result<Option<String>, AuthError> {
    match result {
        Ok(secret) if secret.is_empty() => Ok(None),
        Ok(secret) => Ok(Some(secret)),
        Err(keyring::Error::NoEntry) => Ok(None),
        Err(e) => Err(unavailable(&e)),
    }
}

impl CredentialStore for KeyringStore {
    fn get(&self, host: &str, user: &str) -> Result<Option<String>, AuthError> {
        let entry = keyring::Entry::new(host, user).map_err(|e| unavailable(&e))?;
        let secret = entry_secret(entry.get_password())?;

        if secret.is_none() {
            log::debug!("No keyring entry for {user}@{host}");
        }

        Ok(secret)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_entry_is_none() {
        assert_eq!(entry_secret(Err(keyring::Error::NoEntry)).unwrap(), None);
        assert_eq!(entry_secret(Ok(String::new())).unwrap(), None);
        assert_eq!(
            entry_secret(Ok("tok".to_string())).unwrap().as_deref(),
            Some("tok")
        );
    }

    #[test]
    fn test_platform_failure_is_unavailable() {
        let err = entry_secret(Err(keyring::Error::PlatformFailure(
            "locked".to_string().into(),
        )))
        .unwrap_err();

        assert!(matches!(err, AuthError::CredentialStoreUnavailable { .. }));
        assert!(err.to_string().starts_with("credential store unavailable: "));
    }

    #[test]
    fn test_store_without_entry() {
        keyring::set_default_credential_builder(keyring::mock::default_credential_builder());

        let secret = KeyringStore::new().get("bitbucket.org", "alice").unwrap();
        assert_eq!(secret, None);
    }
}
