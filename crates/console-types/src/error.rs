//! Backend failure taxonomy.

use thiserror::Error;

/// How decisive a failed backend call is about the stored credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureClass {
    /// The backend rejected the credential itself. The credential is invalid.
    IdentityRejected,
    /// The identity was accepted but this capability is not permitted.
    AuthorizationOnly,
    /// Nothing was learned about the credential (network, timeout, server trouble).
    Indeterminate,
}

/// Error returned by any consumed backend capability.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// The backend rejected the credential (HTTP 401).
    #[error("Unauthenticated: {0}")]
    Unauthenticated(String),

    /// The credential is valid but not allowed to use this capability (HTTP 403).
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Caller-supplied input was rejected (blank login fields, HTTP 400/422).
    #[error("Validation failed: {0}")]
    Validation(String),

    /// The backend could not be reached.
    #[error("Network unavailable: {0}")]
    NetworkUnavailable(String),

    /// The request timed out.
    #[error("Request timed out")]
    Timeout,

    /// The backend answered with a status the caller did not expect.
    #[error("Server error: HTTP {status}: {message}")]
    Server { status: u16, message: String },

    /// The response body could not be understood.
    #[error("Malformed response: {0}")]
    Malformed(String),
}

impl ApiError {
    /// Map an HTTP status and body to an error.
    pub fn from_status(status: u16, body: impl Into<String>) -> Self {
        let message = body.into();
        match status {
            401 => ApiError::Unauthenticated(message),
            403 => ApiError::Forbidden(message),
            400 | 422 => ApiError::Validation(message),
            408 | 504 => ApiError::Timeout,
            _ => ApiError::Server { status, message },
        }
    }

    /// Classify this failure for session verification.
    ///
    /// Only a 401 is decisive. Everything that is neither a 401 nor a 403,
    /// including unexpected 4xx responses, is indeterminate.
    pub fn classify(&self) -> FailureClass {
        match self {
            ApiError::Unauthenticated(_) => FailureClass::IdentityRejected,
            ApiError::Forbidden(_) => FailureClass::AuthorizationOnly,
            _ => FailureClass::Indeterminate,
        }
    }

    /// Returns true if retrying the same call later could succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            ApiError::NetworkUnavailable(_) | ApiError::Timeout => true,
            ApiError::Server { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

/// Result type alias using ApiError.
pub type ApiResult<T> = Result<T, ApiError>;
