//! Identity capability consumed from the backend.

use async_trait::async_trait;
use console_storage::Credential;
use console_types::{ApiResult, Principal};

/// Result of a successful sign-in.
#[derive(Debug, Clone)]
pub struct LoginGrant {
    pub credential: Credential,
    pub principal: Principal,
}

#[async_trait]
pub trait IdentityApi: Send + Sync {
    /// Resolve the principal the credential belongs to.
    ///
    /// Failures carry their decisiveness through `ApiError::classify`.
    async fn verify_identity(&self, credential: &Credential) -> ApiResult<Principal>;

    /// Exchange sign-in details for a credential.
    async fn authenticate(&self, identifier: &str, secret: &str) -> ApiResult<LoginGrant>;
}
