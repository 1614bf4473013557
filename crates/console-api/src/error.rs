//! Client construction errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    /// The HTTP client could not be built.
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid API URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The API URL cannot carry path segments (e.g. `mailto:`).
    #[error("API URL cannot be used as a base: {0}")]
    NotABase(String),
}

pub type ClientResult<T> = Result<T, ClientError>;
