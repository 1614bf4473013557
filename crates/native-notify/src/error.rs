//! Platform error types.

use thiserror::Error;

/// Failure reported by the host notification platform.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlatformError {
    #[error("Notifications are not supported on this platform")]
    Unsupported,

    #[error("Permission request failed: {0}")]
    Request(String),

    #[error("Display failed: {0}")]
    Display(String),
}

pub type PlatformResult<T> = Result<T, PlatformError>;
