//! Feed error types.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FeedError {
    /// A push frame could not be decoded.
    #[error("Invalid push frame: {0}")]
    Decode(#[from] serde_json::Error),

    /// No live subscription is open to deliver to.
    #[error("No live subscription is open")]
    NotSubscribed,
}

pub type FeedResult<T> = Result<T, FeedError>;
