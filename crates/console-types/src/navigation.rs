//! Host navigation capability.

use async_trait::async_trait;
use thiserror::Error;

/// In-app navigation failed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Navigation to {route} failed: {reason}")]
pub struct NavigationError {
    pub route: String,
    pub reason: String,
}

/// Navigation provided by the host shell.
#[async_trait]
pub trait Navigator: Send + Sync {
    /// In-app route change. Resolves once the router settled.
    async fn navigate(&self, route: &str) -> Result<(), NavigationError>;

    /// Full-page location change that discards all in-memory state.
    fn hard_navigate(&self, url: &str);

    /// Bring the application window to the foreground.
    fn focus_window(&self) {}
}
