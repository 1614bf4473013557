//! Runtime assembly errors.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RuntimeError {
    #[error("Configuration error: {0}")]
    Config(#[from] console_config::ConfigError),

    #[error("Storage error: {0}")]
    Storage(#[from] console_storage::StorageError),

    #[error("Backend client error: {0}")]
    Client(#[from] console_api::ClientError),
}

pub type RuntimeResult<T> = Result<T, RuntimeError>;
