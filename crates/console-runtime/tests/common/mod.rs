//! Test doubles shared by the runtime integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use console_config::Config;
use console_runtime::{Backends, ConsoleRuntime, SessionContext};
use console_session::{IdentityApi, LoginGrant};
use console_storage::{Credential, CredentialStore, MemoryStore};
use console_types::{ApiError, ApiResult, NavigationError, Navigator, Principal, Role};
use native_notify::{
    DisplayEvent, DisplayHandle, DisplayOptions, DisplayedNotification, NotificationPlatform,
    PermissionState, PlatformResult,
};
use notification_feed::{LocalTransport, NotificationApi, ReadAck, ServerNotification};
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, Notify};

// =========================================================================
// Identity
// =========================================================================

#[derive(Default)]
pub struct FakeIdentity {
    /// Verification outcome per credential token.
    pub verify: Mutex<HashMap<String, ApiResult<Principal>>>,
    pub login: Mutex<Option<ApiResult<LoginGrant>>>,
    pub verify_calls: AtomicUsize,
    /// When set, verification waits for a permit before answering.
    pub gate: Option<Arc<Notify>>,
}

impl FakeIdentity {
    pub fn verifying(token: &str, outcome: ApiResult<Principal>) -> Self {
        let identity = Self::default();
        identity.verify.lock().insert(token.to_string(), outcome);
        identity
    }

    pub fn granting(token: &str, principal: Principal) -> Self {
        let identity = Self::default();
        *identity.login.lock() = Some(Ok(LoginGrant {
            credential: Credential::new(token),
            principal,
        }));
        identity
    }

    pub fn verify_calls(&self) -> usize {
        self.verify_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IdentityApi for FakeIdentity {
    async fn verify_identity(&self, credential: &Credential) -> ApiResult<Principal> {
        self.verify_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        self.verify
            .lock()
            .get(credential.expose())
            .cloned()
            .unwrap_or_else(|| Err(ApiError::Unauthenticated("unknown credential".into())))
    }

    async fn authenticate(&self, _identifier: &str, _secret: &str) -> ApiResult<LoginGrant> {
        self.login
            .lock()
            .clone()
            .unwrap_or_else(|| Err(ApiError::Validation("bad credentials".into())))
    }
}

// =========================================================================
// Notifications
// =========================================================================

#[derive(Default)]
pub struct FakeNotifications {
    pub snapshot: Mutex<Vec<serde_json::Value>>,
    pub fail_snapshot: bool,
    /// Snapshot fetches never complete.
    pub stall_snapshot: bool,
    pub fail_acks: bool,
    pub acks: Mutex<Vec<ReadAck>>,
    pub fetches: AtomicUsize,
}

impl FakeNotifications {
    pub fn with_snapshot(items: Vec<serde_json::Value>) -> Self {
        Self {
            snapshot: Mutex::new(items),
            ..Default::default()
        }
    }

    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl NotificationApi for FakeNotifications {
    async fn fetch_snapshot(&self) -> ApiResult<Vec<ServerNotification>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if self.stall_snapshot {
            std::future::pending::<()>().await;
        }
        if self.fail_snapshot {
            return Err(ApiError::Server {
                status: 500,
                message: "boom".into(),
            });
        }
        self.snapshot
            .lock()
            .iter()
            .map(|raw| serde_json::from_value(raw.clone()).map_err(|e| ApiError::Malformed(e.to_string())))
            .collect()
    }

    async fn acknowledge_read(&self, ack: ReadAck) -> ApiResult<()> {
        self.acks.lock().push(ack);
        if self.fail_acks {
            return Err(ApiError::NetworkUnavailable("offline".into()));
        }
        Ok(())
    }
}

// =========================================================================
// Platform
// =========================================================================

pub struct FakePlatform {
    pub permission: Mutex<PermissionState>,
    pub answers: Mutex<VecDeque<PermissionState>>,
    pub requests: AtomicUsize,
    pub displayed: Mutex<Vec<DisplayOptions>>,
    pub senders: Mutex<Vec<mpsc::UnboundedSender<DisplayEvent>>>,
}

impl FakePlatform {
    pub fn new(permission: PermissionState) -> Self {
        Self {
            permission: Mutex::new(permission),
            answers: Mutex::new(VecDeque::new()),
            requests: AtomicUsize::new(0),
            displayed: Mutex::new(Vec::new()),
            senders: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    pub fn displayed_tags(&self) -> Vec<String> {
        self.displayed.lock().iter().map(|o| o.tag.clone()).collect()
    }
}

struct NoopHandle;

impl DisplayHandle for NoopHandle {
    fn close(&self) {}
}

#[async_trait]
impl NotificationPlatform for FakePlatform {
    fn is_supported(&self) -> bool {
        true
    }

    fn permission(&self) -> PermissionState {
        *self.permission.lock()
    }

    async fn request_permission(&self) -> PlatformResult<PermissionState> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        let answer = self.answers.lock().pop_front().unwrap_or_default();
        *self.permission.lock() = answer;
        Ok(answer)
    }

    fn display(&self, options: DisplayOptions) -> PlatformResult<DisplayedNotification> {
        self.displayed.lock().push(options);
        let (tx, rx) = mpsc::unbounded_channel();
        self.senders.lock().push(tx);
        Ok(DisplayedNotification {
            events: rx,
            handle: Box::new(NoopHandle),
        })
    }
}

// =========================================================================
// Navigation
// =========================================================================

#[derive(Default)]
pub struct RecordingNavigator {
    pub navigations: Mutex<Vec<String>>,
    pub hard: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    pub fn navigations(&self) -> Vec<String> {
        self.navigations.lock().clone()
    }
}

#[async_trait]
impl Navigator for RecordingNavigator {
    async fn navigate(&self, route: &str) -> Result<(), NavigationError> {
        self.navigations.lock().push(route.to_string());
        Ok(())
    }

    fn hard_navigate(&self, url: &str) {
        self.hard.lock().push(url.to_string());
    }
}

// =========================================================================
// Harness
// =========================================================================

pub struct Harness {
    pub runtime: ConsoleRuntime,
    pub identity: Arc<FakeIdentity>,
    pub notifications: Arc<FakeNotifications>,
    pub transport: LocalTransport,
    pub platform: Arc<FakePlatform>,
    pub navigator: Arc<RecordingNavigator>,
    pub credentials: CredentialStore,
}

impl Harness {
    pub fn new(
        identity: FakeIdentity,
        notifications: FakeNotifications,
        platform: FakePlatform,
        stored_token: Option<&str>,
    ) -> Self {
        let store = Arc::new(MemoryStore::new());
        let navigator = Arc::new(RecordingNavigator::default());
        let context = SessionContext::new(
            Config::default(),
            store,
            navigator.clone(),
            tokio::runtime::Handle::current(),
        );
        if let Some(token) = stored_token {
            context.credentials.save(&Credential::new(token)).unwrap();
        }

        let identity = Arc::new(identity);
        let notifications = Arc::new(notifications);
        let transport = LocalTransport::new();
        let platform = Arc::new(platform);
        let credentials = context.credentials.clone();

        let runtime = ConsoleRuntime::new(
            context,
            Backends {
                identity: identity.clone(),
                notifications: notifications.clone(),
                transport: Arc::new(transport.clone()),
                platform: platform.clone(),
            },
        );

        Self {
            runtime,
            identity,
            notifications,
            transport,
            platform,
            navigator,
            credentials,
        }
    }
}

pub fn admin(id: &str) -> Principal {
    Principal::new(id, "Ana", Role::Admin)
}

/// Yield until `condition` holds. Returns whether it did.
pub async fn eventually(mut condition: impl FnMut() -> bool) -> bool {
    for _ in 0..200 {
        if condition() {
            return true;
        }
        tokio::task::yield_now().await;
    }
    condition()
}

/// Let spawned tasks run to quiescence.
pub async fn settle() {
    for _ in 0..50 {
        tokio::task::yield_now().await;
    }
}
