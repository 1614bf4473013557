//! HTTP client for the console backend.

use crate::wire::{Envelope, LoginRequest, LoginResponse};
use crate::{ClientError, ClientResult};
use async_trait::async_trait;
use console_config::{timing::HTTP_TIMEOUT, Config};
use console_session::{IdentityApi, LoginGrant};
use console_storage::{Credential, CredentialStore};
use console_types::{ApiError, ApiResult, Principal};
use notification_feed::{NotificationApi, ReadAck, ServerNotification};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// REST implementation of [`IdentityApi`] and [`NotificationApi`].
///
/// Notification calls authenticate with whatever credential the store holds
/// at call time.
#[derive(Clone)]
pub struct HttpBackend {
    http_client: reqwest::Client,
    api_url: Url,
    credentials: CredentialStore,
}

impl HttpBackend {
    pub fn new(api_url: &str, credentials: CredentialStore) -> ClientResult<Self> {
        Self::with_timeout(api_url, credentials, HTTP_TIMEOUT)
    }

    pub fn with_timeout(
        api_url: &str,
        credentials: CredentialStore,
        timeout: Duration,
    ) -> ClientResult<Self> {
        let api_url = Url::parse(api_url)?;
        if api_url.cannot_be_a_base() {
            return Err(ClientError::NotABase(api_url.to_string()));
        }
        let http_client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http_client,
            api_url,
            credentials,
        })
    }

    pub fn from_config(config: &Config, credentials: CredentialStore) -> ClientResult<Self> {
        Self::new(&config.api_url, credentials)
    }

    /// Build the URL for `segments` below the API base. Each segment is
    /// percent-encoded.
    fn endpoint(&self, segments: &[&str]) -> ApiResult<Url> {
        let mut url = self.api_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::Malformed(format!("unusable API URL {}", self.api_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn stored_credential(&self) -> Option<Credential> {
        match self.credentials.load() {
            Ok(credential) => credential,
            Err(e) => {
                warn!(error = %e, "Failed to read credential, sending request without it");
                None
            }
        }
    }

    // =========================================================================
    // HTTP helpers
    // =========================================================================

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: Url,
        credential: Option<&Credential>,
    ) -> ApiResult<T> {
        let mut request = self.http_client.get(url.clone());
        if let Some(credential) = credential {
            request = request.bearer_auth(credential.expose());
        }
        let response = request.send().await.map_err(transport_error)?;
        decode(check_response(&url, response).await?).await
    }

    async fn post_json<B: Serialize + ?Sized>(
        &self,
        url: Url,
        body: &B,
        credential: Option<&Credential>,
    ) -> ApiResult<reqwest::Response> {
        let mut request = self.http_client.post(url.clone()).json(body);
        if let Some(credential) = credential {
            request = request.bearer_auth(credential.expose());
        }
        let response = request.send().await.map_err(transport_error)?;
        check_response(&url, response).await
    }
}

/// Map a non-success status to its `ApiError`.
async fn check_response(url: &Url, response: reqwest::Response) -> ApiResult<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    debug!(url = %url, status = status.as_u16(), "Backend request failed");
    Err(ApiError::from_status(status.as_u16(), body))
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> ApiResult<T> {
    let bytes = response.bytes().await.map_err(transport_error)?;
    let envelope: Envelope<T> =
        serde_json::from_slice(&bytes).map_err(|e| ApiError::Malformed(e.to_string()))?;
    Ok(envelope.into_inner())
}

fn transport_error(e: reqwest::Error) -> ApiError {
    if e.is_timeout() {
        ApiError::Timeout
    } else if e.is_decode() {
        ApiError::Malformed(e.to_string())
    } else {
        ApiError::NetworkUnavailable(e.to_string())
    }
}

#[async_trait]
impl IdentityApi for HttpBackend {
    async fn verify_identity(&self, credential: &Credential) -> ApiResult<Principal> {
        let url = self.endpoint(&["auth", "me"])?;
        self.get_json(url, Some(credential)).await
    }

    async fn authenticate(&self, identifier: &str, secret: &str) -> ApiResult<LoginGrant> {
        let url = self.endpoint(&["auth", "login"])?;
        let body = LoginRequest {
            identifier,
            password: secret,
        };
        let response = self.post_json(url, &body, None).await?;
        let login: LoginResponse = decode(response).await?;
        if login.token.trim().is_empty() {
            return Err(ApiError::Malformed("login response carried no credential".into()));
        }
        Ok(LoginGrant {
            credential: Credential::new(login.token),
            principal: login.user,
        })
    }
}

#[async_trait]
impl NotificationApi for HttpBackend {
    async fn fetch_snapshot(&self) -> ApiResult<Vec<ServerNotification>> {
        let url = self.endpoint(&["notifications"])?;
        let credential = self.stored_credential();
        let items: Vec<ServerNotification> = self.get_json(url, credential.as_ref()).await?;
        debug!(count = items.len(), "Fetched notification snapshot");
        Ok(items)
    }

    async fn acknowledge_read(&self, ack: ReadAck) -> ApiResult<()> {
        let url = match &ack {
            ReadAck::One(id) => self.endpoint(&["notifications", id.as_str(), "read"])?,
            ReadAck::All => self.endpoint(&["notifications", "read-all"])?,
        };
        let credential = self.stored_credential();
        self.post_json(url, &serde_json::json!({}), credential.as_ref())
            .await?;
        Ok(())
    }
}

impl std::fmt::Debug for HttpBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpBackend")
            .field("api_url", &self.api_url.as_str())
            .finish_non_exhaustive()
    }
}
