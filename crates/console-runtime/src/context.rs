//! Shared handles the runtime components are built from.

use console_api::HttpBackend;
use console_config::{Config, RouteTable};
use console_session::IdentityApi;
use console_storage::{CredentialStore, KeyValueStore};
use console_types::Navigator;
use native_notify::NotificationPlatform;
use notification_feed::{LiveTransport, NotificationApi};
use std::sync::Arc;

/// Process-wide session context (thread-safe).
///
/// Replaces ambient globals: every component receives the pieces it needs
/// from here. The credential cell is written only by the session manager,
/// except for the access guard's purge of generic-user credentials.
#[derive(Clone)]
pub struct SessionContext {
    pub config: Arc<Config>,
    pub credentials: CredentialStore,
    pub navigator: Arc<dyn Navigator>,
    /// Runtime the components spawn their background work on.
    pub runtime: tokio::runtime::Handle,
}

impl SessionContext {
    pub fn new(
        config: Config,
        store: Arc<dyn KeyValueStore>,
        navigator: Arc<dyn Navigator>,
        runtime: tokio::runtime::Handle,
    ) -> Self {
        Self {
            config: Arc::new(config),
            credentials: CredentialStore::new(store),
            navigator,
            runtime,
        }
    }

    pub fn routes(&self) -> &RouteTable {
        &self.config.routes
    }
}

/// Capabilities consumed from outside the runtime.
#[derive(Clone)]
pub struct Backends {
    pub identity: Arc<dyn IdentityApi>,
    pub notifications: Arc<dyn NotificationApi>,
    pub transport: Arc<dyn LiveTransport>,
    pub platform: Arc<dyn NotificationPlatform>,
}

impl Backends {
    /// Identity and notifications over the REST backend.
    pub fn http(
        backend: HttpBackend,
        transport: Arc<dyn LiveTransport>,
        platform: Arc<dyn NotificationPlatform>,
    ) -> Self {
        let backend = Arc::new(backend);
        Self {
            identity: backend.clone(),
            notifications: backend,
            transport,
            platform,
        }
    }
}
