//! Credential storage for the loyalty console runtime.
//!
//! A single persisted key holds the opaque bearer credential. This crate
//! never interprets it. Backends:
//! - [`MemoryStore`]: process-local, for tests and ephemeral hosts
//! - [`FileStore`]: JSON document on disk, written atomically

mod credential;
mod file;
mod keys;
mod memory;
mod traits;

pub use credential::{Credential, CredentialStore};
pub use file::FileStore;
pub use keys::StorageKeys;
pub use memory::MemoryStore;
pub use traits::KeyValueStore;

use thiserror::Error;

/// Error type for storage operations.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Backend-specific storage error
    #[error("Storage backend error: {0}")]
    Backend(String),

    /// Encoding/decoding error
    #[error("Encoding error: {0}")]
    Encoding(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;
