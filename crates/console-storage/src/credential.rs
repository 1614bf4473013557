//! The persisted bearer credential.

use crate::{KeyValueStore, StorageKeys, StorageResult};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

/// Opaque bearer credential. Never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The raw token, for attaching to outgoing requests.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential([redacted])")
    }
}

/// Process-wide cell holding the credential under [`StorageKeys::CREDENTIAL`].
///
/// Writers: the session manager (login, verification purge, logout) and the
/// access guard's purge when a view does not admit the generic user role.
#[derive(Clone)]
pub struct CredentialStore {
    store: Arc<dyn KeyValueStore>,
}

impl CredentialStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Read the credential. A blank stored value counts as absent.
    pub fn load(&self) -> StorageResult<Option<Credential>> {
        Ok(self
            .store
            .get(StorageKeys::CREDENTIAL)?
            .filter(|token| !token.trim().is_empty())
            .map(Credential))
    }

    pub fn save(&self, credential: &Credential) -> StorageResult<()> {
        self.store.set(StorageKeys::CREDENTIAL, credential.expose())?;
        debug!("Credential stored");
        Ok(())
    }

    /// Remove the credential. Returns whether one was present.
    pub fn purge(&self) -> StorageResult<bool> {
        let removed = self.store.delete(StorageKeys::CREDENTIAL)?;
        if removed {
            info!("Credential purged");
        }
        Ok(removed)
    }

    pub fn exists(&self) -> bool {
        matches!(self.load(), Ok(Some(_)))
    }
}

impl fmt::Debug for CredentialStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialStore").finish_non_exhaustive()
    }
}
