//! Bearer credential persistence

use crate::error::CoreResult;
use crate::storage::KeyValueStorage;
use std::sync::Arc;
use tracing::warn;

/// Storage key the credential lives under
pub const TOKEN_STORAGE_KEY: &str = "AuthTokenKey";

/// Reads and writes the authentication token in durable storage.
///
/// The token is opaque: no shape validation is performed and the stored
/// string round-trips exactly. Clones share the same backing storage.
#[derive(Clone)]
pub struct CredentialStore {
    storage: Arc<dyn KeyValueStorage>,
}

impl CredentialStore {
    #[must_use]
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self { storage }
    }

    /// Write the credential, overwriting any existing value
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be written.
    pub fn set(&self, token: &str) -> CoreResult<()> {
        self.storage.set(TOKEN_STORAGE_KEY, token)
    }

    /// Raw stored value, if any
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be read.
    pub fn get(&self) -> CoreResult<Option<String>> {
        self.storage.get(TOKEN_STORAGE_KEY)
    }

    /// Current credential, treating unreadable storage and an empty string as
    /// no credential
    #[must_use]
    pub fn token(&self) -> Option<String> {
        match self.get() {
            Ok(token) => token.filter(|token| !token.is_empty()),
            Err(err) => {
                warn!("Failed to read stored credential: {err}");
                None
            }
        }
    }

    /// Whether a usable credential is stored
    #[must_use]
    pub fn has(&self) -> bool {
        self.token().is_some()
    }

    /// Delete the credential. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be written.
    pub fn remove(&self) -> CoreResult<()> {
        self.storage.remove(TOKEN_STORAGE_KEY)
    }
}

impl std::fmt::Debug for CredentialStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialStore")
            .field("has_token", &self.has())
            .finish()
    }
}
