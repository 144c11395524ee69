//! Bearer-token session storage.
//!
//! A single global slot holds the token for the one signed-in user. Stores are
//! plain values handed to the API client at construction, so tests can inject
//! an in-memory slot instead of the OS keychain.

mod client;
mod file_store;

use std::fmt;
use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub use client::IdentityClient;
pub use file_store::FileTokenStore;

/// Opaque credential sent as `Authorization: Bearer <token>`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuthToken(String);

impl AuthToken {
    /// Wraps a raw token, returning `None` for blank input.
    pub fn new(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("AuthToken([REDACTED])")
    }
}

/// Persistent slot for the session token.
pub trait TokenStore: Clone + Send + Sync + 'static {
    fn load(&self) -> Result<Option<AuthToken>>;
    fn save(&self, token: &AuthToken) -> Result<()>;
    fn clear(&self) -> Result<()>;

    /// True iff a token is present. Storage errors count as signed out.
    fn is_authenticated(&self) -> bool {
        match self.load() {
            Ok(token) => token.is_some(),
            Err(error) => {
                tracing::warn!("Failed to read stored token: {}", error);
                false
            }
        }
    }
}

/// Process-local token slot shared between clones.
#[derive(Debug, Clone, Default)]
pub struct MemoryTokenStore {
    slot: Arc<RwLock<Option<AuthToken>>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(raw: impl Into<String>) -> Self {
        Self {
            slot: Arc::new(RwLock::new(AuthToken::new(raw))),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<Option<AuthToken>> {
        let guard = self
            .slot
            .read()
            .map_err(|error| Error::Storage(error.to_string()))?;
        Ok(guard.clone())
    }

    fn save(&self, token: &AuthToken) -> Result<()> {
        let mut guard = self
            .slot
            .write()
            .map_err(|error| Error::Storage(error.to_string()))?;
        *guard = Some(token.clone());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        let mut guard = self
            .slot
            .write()
            .map_err(|error| Error::Storage(error.to_string()))?;
        *guard = None;
        Ok(())
    }
}

/// Two stores read in precedence order: `primary`, then `fallback`.
///
/// Writes go to the primary store, or to the fallback when the primary
/// rejects them. Clearing empties both so a stale fallback token cannot
/// resurrect a signed-out session.
#[derive(Debug, Clone)]
pub struct LayeredTokenStore<P, F> {
    primary: P,
    fallback: F,
}

impl<P: TokenStore, F: TokenStore> LayeredTokenStore<P, F> {
    pub const fn new(primary: P, fallback: F) -> Self {
        Self { primary, fallback }
    }
}

impl<P: TokenStore, F: TokenStore> TokenStore for LayeredTokenStore<P, F> {
    fn load(&self) -> Result<Option<AuthToken>> {
        match self.primary.load() {
            Ok(Some(token)) => return Ok(Some(token)),
            Ok(None) => {}
            Err(error) => tracing::warn!("Primary token store unavailable: {}", error),
        }
        self.fallback.load()
    }

    fn save(&self, token: &AuthToken) -> Result<()> {
        match self.primary.save(token) {
            Ok(()) => Ok(()),
            Err(error) => {
                tracing::warn!("Primary token store rejected write, using fallback: {}", error);
                self.fallback.save(token)
            }
        }
    }

    fn clear(&self) -> Result<()> {
        let primary = self.primary.clear();
        let fallback = self.fallback.clear();
        primary.and(fallback)
    }
}
