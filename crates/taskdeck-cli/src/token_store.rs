//! CLI session token persistence: OS keychain first, token file second.

#[cfg(test)]
use std::collections::HashMap;
#[cfg(test)]
use std::sync::{Mutex, OnceLock};

#[cfg(not(test))]
use keyring::Entry;

use taskdeck_core::auth::{AuthToken, FileTokenStore, LayeredTokenStore, TokenStore};
use taskdeck_core::{Error, Result};

use crate::error::CliError;

#[cfg(not(test))]
const KEYRING_SERVICE_NAME: &str = "taskdeck";
const KEYRING_USERNAME: &str = "session_token";
const TOKEN_FILE_NAME: &str = "session-token";

pub type CliTokenStore = LayeredTokenStore<KeyringTokenStore, FileTokenStore>;

#[derive(Debug, Clone)]
pub struct KeyringTokenStore {
    username: String,
}

impl KeyringTokenStore {
    pub fn new() -> Self {
        Self {
            username: KEYRING_USERNAME.to_string(),
        }
    }

    #[cfg(test)]
    pub fn with_username(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
        }
    }

    #[cfg(test)]
    fn test_store() -> &'static Mutex<HashMap<String, String>> {
        static STORE: OnceLock<Mutex<HashMap<String, String>>> = OnceLock::new();
        STORE.get_or_init(|| Mutex::new(HashMap::new()))
    }

    #[cfg(not(test))]
    fn entry(&self) -> Result<Entry> {
        Entry::new(KEYRING_SERVICE_NAME, &self.username)
            .map_err(|error| Error::Storage(error.to_string()))
    }
}

impl Default for KeyringTokenStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenStore for KeyringTokenStore {
    #[cfg(not(test))]
    fn load(&self) -> Result<Option<AuthToken>> {
        match self.entry()?.get_password() {
            Ok(raw) => Ok(AuthToken::new(raw)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(error) => Err(Error::Storage(error.to_string())),
        }
    }

    #[cfg(test)]
    fn load(&self) -> Result<Option<AuthToken>> {
        let guard = Self::test_store()
            .lock()
            .map_err(|error| Error::Storage(error.to_string()))?;
        Ok(guard.get(&self.username).cloned().and_then(AuthToken::new))
    }

    #[cfg(not(test))]
    fn save(&self, token: &AuthToken) -> Result<()> {
        self.entry()?
            .set_password(token.expose())
            .map_err(|error| Error::Storage(error.to_string()))
    }

    #[cfg(test)]
    fn save(&self, token: &AuthToken) -> Result<()> {
        let mut guard = Self::test_store()
            .lock()
            .map_err(|error| Error::Storage(error.to_string()))?;
        guard.insert(self.username.clone(), token.expose().to_string());
        Ok(())
    }

    #[cfg(not(test))]
    fn clear(&self) -> Result<()> {
        match self.entry()?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(error) => Err(Error::Storage(error.to_string())),
        }
    }

    #[cfg(test)]
    fn clear(&self) -> Result<()> {
        let mut guard = Self::test_store()
            .lock()
            .map_err(|error| Error::Storage(error.to_string()))?;
        guard.remove(&self.username);
        Ok(())
    }
}

/// Keychain entry backed by `<config dir>/taskdeck/session-token`.
pub fn default_token_store() -> std::result::Result<CliTokenStore, CliError> {
    let path = dirs::config_dir()
        .ok_or(CliError::NoConfigDir)?
        .join("taskdeck")
        .join(TOKEN_FILE_NAME);
    Ok(LayeredTokenStore::new(
        KeyringTokenStore::new(),
        FileTokenStore::new(path),
    ))
}
