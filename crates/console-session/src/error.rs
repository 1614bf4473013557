//! Session error types.

use console_types::ApiError;
use thiserror::Error;

/// Error surfaced by login and logout.
#[derive(Error, Debug)]
pub enum AuthError {
    /// Backend failure, passed through untouched.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Storage error
    #[error("Storage error: {0}")]
    Storage(#[from] console_storage::StorageError),

    /// The session was reset while the request was in flight; its result was discarded.
    #[error("Session was reset while the request was in flight")]
    Superseded,

    /// Invalid state transition in the session FSM
    #[error("Invalid session state transition: {0}")]
    InvalidStateTransition(String),
}

impl AuthError {
    /// Returns true for caller-supplied input problems.
    pub fn is_validation(&self) -> bool {
        matches!(self, AuthError::Api(ApiError::Validation(_)))
    }

    /// Returns true if this error is transient and the operation can be retried.
    pub fn is_transient(&self) -> bool {
        match self {
            AuthError::Api(e) => e.is_transient(),
            _ => false,
        }
    }
}

/// Result type alias using AuthError.
pub type AuthResult<T> = Result<T, AuthError>;
