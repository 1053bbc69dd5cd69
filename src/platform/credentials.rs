//! Access token handling and storage in the OS secret store

use crate::error::SwitchdlError;
use secrecy::{ExposeSecret, SecretString};
use std::fmt;
use std::sync::Mutex;
use tracing::debug;

/// Keyring service name
pub const KEYRING_SERVICE: &str = "switchdl";
/// Keyring user
pub const KEYRING_USER: &str = "default";

/// SwitchTube API access token
pub struct AccessToken(SecretString);

impl AccessToken {
    pub fn new(token: &str) -> Self {
        Self(SecretString::from(token.to_string()))
    }

    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl Clone for AccessToken {
    fn clone(&self) -> Self {
        Self::new(self.expose())
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(***)")
    }
}

/// Storage for the access token
pub trait CredentialStore {
    /// Stored token, `None` if nothing is stored
    fn get(&self) -> Result<Option<AccessToken>, SwitchdlError>;
    fn set(&self, token: &str) -> Result<(), SwitchdlError>;
    /// Deleting a missing token is not an error
    fn delete(&self) -> Result<(), SwitchdlError>;
}

/// Token store backed by the system keyring
#[derive(Debug, Clone)]
pub struct KeyringStore {
    service: String,
    user: String,
}

impl KeyringStore {
    pub fn new() -> Self {
        Self {
            service: KEYRING_SERVICE.to_string(),
            user: KEYRING_USER.to_string(),
        }
    }

    fn entry(&self) -> Result<keyring::Entry, SwitchdlError> {
        Ok(keyring::Entry::new(&self.service, &self.user)?)
    }
}

impl Default for KeyringStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialStore for KeyringStore {
    fn get(&self) -> Result<Option<AccessToken>, SwitchdlError> {
        match self.entry()?.get_password() {
            Ok(token) => Ok(Some(AccessToken::new(&token))),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, token: &str) -> Result<(), SwitchdlError> {
        let token = validate_token_input(token)?;
        self.entry()?.set_password(token)?;
        debug!("Stored access token in keyring service '{}'", self.service);
        Ok(())
    }

    fn delete(&self) -> Result<(), SwitchdlError> {
        match self.entry()?.delete_password() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-memory token store
#[derive(Debug, Default)]
pub struct MemoryStore {
    token: Mutex<Option<String>>,
}

impl MemoryStore {
    pub fn with_token(token: &str) -> Self {
        Self {
            token: Mutex::new(Some(token.to_string())),
        }
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, Option<String>> {
        self.token.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl CredentialStore for MemoryStore {
    fn get(&self) -> Result<Option<AccessToken>, SwitchdlError> {
        Ok(self.slot().as_deref().map(AccessToken::new))
    }

    fn set(&self, token: &str) -> Result<(), SwitchdlError> {
        let token = validate_token_input(token)?;
        *self.slot() = Some(token.to_string());
        Ok(())
    }

    fn delete(&self) -> Result<(), SwitchdlError> {
        *self.slot() = None;
        Ok(())
    }
}

fn validate_token_input(token: &str) -> Result<&str, SwitchdlError> {
    let token = token.trim();
    if token.is_empty() {
        return Err(SwitchdlError::Validation(
            "access token cannot be empty".to_string(),
        ));
    }
    Ok(token)
}

/// Pick the token for this run: an explicit token wins over the stored one
pub fn resolve_token(
    explicit: Option<&str>,
    store: &dyn CredentialStore,
) -> Result<AccessToken, SwitchdlError> {
    if let Some(token) = explicit.map(str::trim).filter(|t| !t.is_empty()) {
        debug!("Using explicitly provided access token");
        return Ok(AccessToken::new(token));
    }

    store.get()?.ok_or_else(|| {
        SwitchdlError::Auth(format!(
            "access token not found in keyring for service '{}' and user '{}'. Run 'switchdl configure' or provide it with the --token flag or SWITCHDL_TOKEN environment variable",
            KEYRING_SERVICE, KEYRING_USER
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_token_takes_precedence() {
        let store = MemoryStore::with_token("stored");
        let token = resolve_token(Some("explicit"), &store).unwrap();
        assert_eq!(token.expose(), "explicit");
    }

    #[test]
    fn test_stored_token_used_when_no_explicit() {
        let store = MemoryStore::with_token("stored");
        assert_eq!(resolve_token(None, &store).unwrap().expose(), "stored");
        assert_eq!(resolve_token(Some("  "), &store).unwrap().expose(), "stored");
    }

    #[test]
    fn test_missing_token_is_auth_error() {
        let store = MemoryStore::default();
        let err = resolve_token(None, &store).unwrap_err();
        assert!(matches!(err, SwitchdlError::Auth(_)));
        assert!(err.to_string().contains("switchdl configure"));
    }

    #[test]
    fn test_memory_store_roundtrip() {
        let store = MemoryStore::default();
        assert!(store.get().unwrap().is_none());
        store.set(" abc ").unwrap();
        assert_eq!(store.get().unwrap().unwrap().expose(), "abc");
        store.delete().unwrap();
        assert!(store.get().unwrap().is_none());
        store.delete().unwrap();
    }

    #[test]
    fn test_empty_token_rejected() {
        let store = MemoryStore::default();
        assert!(matches!(store.set(""), Err(SwitchdlError::Validation(_))));
    }

    #[test]
    fn test_debug_hides_token() {
        let token = AccessToken::new("super-secret");
        assert!(!format!("{:?}", token).contains("super-secret"));
        assert_eq!(token.clone().expose(), "super-secret");
    }
}
