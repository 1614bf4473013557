//! Runtime assembly and session coordination.

use crate::{Backends, RuntimeResult, SessionContext, ViewState};
use access_guard::{AccessGuard, RoutePolicy};
use console_api::HttpBackend;
use console_config::{Config, Paths};
use console_session::{AuthResult, SessionManager, SessionState};
use console_storage::FileStore;
use console_types::{Navigator, Principal};
use native_notify::{InteractionKind, NotificationBridge, NotificationPlatform, PermissionState};
use notification_feed::{LiveTransport, NotificationAggregator};
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// The assembled client runtime.
pub struct ConsoleRuntime {
    context: SessionContext,
    session: SessionManager,
    guard: AccessGuard,
    aggregator: NotificationAggregator,
    bridge: NotificationBridge,
    coordinator: Mutex<Option<JoinHandle<()>>>,
    shutdown: CancellationToken,
}

impl ConsoleRuntime {
    pub fn new(context: SessionContext, backends: Backends) -> Self {
        let routes = context.routes().clone();

        let session = SessionManager::new(
            context.credentials.clone(),
            backends.identity,
            Arc::clone(&context.navigator),
            routes.sign_in.clone(),
        );
        let guard = AccessGuard::new(
            Arc::clone(&context.navigator),
            context.credentials.clone(),
            routes,
        );
        let aggregator = NotificationAggregator::new(
            backends.notifications,
            backends.transport,
            context.runtime.clone(),
        );
        let bridge = NotificationBridge::new(
            backends.platform,
            Arc::clone(&context.navigator),
            context.runtime.clone(),
        );
        aggregator.set_sink(Arc::new(bridge.clone()));

        Self {
            context,
            session,
            guard,
            aggregator,
            bridge,
            coordinator: Mutex::new(None),
            shutdown: CancellationToken::new(),
        }
    }

    /// Build a runtime backed by the file credential store and the REST
    /// backend described by `config`.
    pub fn from_config(
        config: Config,
        paths: &Paths,
        navigator: Arc<dyn Navigator>,
        transport: Arc<dyn LiveTransport>,
        platform: Arc<dyn NotificationPlatform>,
        runtime: tokio::runtime::Handle,
    ) -> RuntimeResult<Self> {
        paths.ensure_dirs()?;
        let store = Arc::new(FileStore::open(paths.state_file())?);
        let context = SessionContext::new(config, store, navigator, runtime);
        let backend = HttpBackend::from_config(&context.config, context.credentials.clone())?;
        Ok(Self::new(context, Backends::http(backend, transport, platform)))
    }

    /// Start following the session and derive it from the stored credential.
    ///
    /// Returns immediately; verification runs in the background. Calling it
    /// again has no effect.
    pub fn start(&self) {
        let mut coordinator = self.coordinator.lock();
        if coordinator.is_some() || self.shutdown.is_cancelled() {
            return;
        }

        let states = self.session.subscribe();
        *coordinator = Some(self.context.runtime.spawn(follow_session(
            self.session.clone(),
            self.aggregator.clone(),
            self.bridge.clone(),
            states,
            self.shutdown.clone(),
        )));
        drop(coordinator);

        info!(api_url = %self.context.config.api_url, "Console runtime started");
        self.session.initialize();
    }

    /// Access decision and render inputs for `route`.
    pub fn view(&self, route: &str, policy: &RoutePolicy) -> ViewState {
        let state = self.session.state();
        let decision = self.guard.decide(&state, policy, route);
        ViewState {
            decision,
            principal: state.principal().cloned(),
            unread_count: self.aggregator.unread_count(),
        }
    }

    pub async fn login(&self, identifier: &str, secret: &str) -> AuthResult<Principal> {
        self.session.login(identifier, secret).await
    }

    /// Sign out. The live channel, feed and permission strategy are torn
    /// down before this returns.
    pub fn logout(&self) -> AuthResult<()> {
        let result = self.session.logout();
        if self.session.state() == SessionState::Unauthenticated {
            self.aggregator.reset();
            self.bridge.reset();
        }
        result
    }

    /// Forward a user interaction to the permission strategy.
    pub fn user_interacted(&self, kind: InteractionKind) {
        self.bridge.user_interacted(kind);
    }

    pub fn session_state(&self) -> SessionState {
        self.session.state()
    }

    pub fn permission(&self) -> PermissionState {
        self.bridge.permission()
    }

    pub fn session(&self) -> &SessionManager {
        &self.session
    }

    pub fn guard(&self) -> &AccessGuard {
        &self.guard
    }

    pub fn aggregator(&self) -> &NotificationAggregator {
        &self.aggregator
    }

    pub fn bridge(&self) -> &NotificationBridge {
        &self.bridge
    }

    pub fn context(&self) -> &SessionContext {
        &self.context
    }

    /// Stop the coordinator and tear down every component's timers and the
    /// live channel.
    pub fn shutdown(&self) {
        self.shutdown.cancel();
        if let Some(handle) = self.coordinator.lock().take() {
            handle.abort();
        }
        self.aggregator.shutdown();
        self.bridge.teardown();
        self.guard.teardown();
        info!("Console runtime stopped");
    }
}

impl Drop for ConsoleRuntime {
    fn drop(&mut self) {
        if !self.shutdown.is_cancelled() {
            self.shutdown();
        }
    }
}

/// Apply every published session state to the aggregator and the bridge.
async fn follow_session(
    session: SessionManager,
    aggregator: NotificationAggregator,
    bridge: NotificationBridge,
    mut states: watch::Receiver<SessionState>,
    shutdown: CancellationToken,
) {
    loop {
        let state = states.borrow_and_update().clone();
        debug!(state = state.name(), "Following session state");

        aggregator.sync_session(&state, session.credential());
        if state == SessionState::Unauthenticated {
            bridge.reset();
        } else if state.principal().is_some_and(|p| !p.is_placeholder()) {
            bridge.on_eligible();
        }

        tokio::select! {
            _ = shutdown.cancelled() => break,
            changed = states.changed() => {
                if changed.is_err() {
                    break;
                }
            }
        }
    }
}
