//! Access guard with debounced redirects.

use crate::{evaluate, AccessDecision, RoutePolicy};
use console_config::{timing::REDIRECT_COOLDOWN, RouteTable};
use console_session::SessionState;
use console_storage::CredentialStore;
use console_types::Navigator;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Per-view access decisions plus the navigation they imply.
///
/// At most one redirect is outstanding per guard. The pending flag is set
/// when a redirect starts and cleared only after the navigation finished and
/// the cool-down elapsed. While it is set, `decide` keeps reporting the
/// redirect decision but does not navigate again.
#[derive(Clone)]
pub struct AccessGuard {
    inner: Arc<GuardInner>,
}

struct GuardInner {
    navigator: Arc<dyn Navigator>,
    credentials: CredentialStore,
    routes: RouteTable,
    cooldown: Duration,
    redirect_pending: AtomicBool,
    shutdown: CancellationToken,
}

impl AccessGuard {
    pub fn new(navigator: Arc<dyn Navigator>, credentials: CredentialStore, routes: RouteTable) -> Self {
        Self::with_cooldown(navigator, credentials, routes, REDIRECT_COOLDOWN)
    }

    pub fn with_cooldown(
        navigator: Arc<dyn Navigator>,
        credentials: CredentialStore,
        routes: RouteTable,
        cooldown: Duration,
    ) -> Self {
        Self {
            inner: Arc::new(GuardInner {
                navigator,
                credentials,
                routes,
                cooldown,
                redirect_pending: AtomicBool::new(false),
                shutdown: CancellationToken::new(),
            }),
        }
    }

    /// Decide access for `current_route` and carry out its side effects.
    ///
    /// Must be called from within a tokio runtime when the decision can be a
    /// redirect.
    pub fn decide(
        &self,
        state: &SessionState,
        policy: &RoutePolicy,
        current_route: &str,
    ) -> AccessDecision {
        let evaluation = evaluate(state, policy, current_route, &self.inner.routes);

        if evaluation.purge_credential {
            match self.inner.credentials.purge() {
                Ok(_) => info!(route = current_route, "View closed to generic users, credential purged"),
                Err(e) => warn!(error = %e, "Failed to purge credential"),
            }
        }

        if let AccessDecision::Redirect(target) = &evaluation.decision {
            self.redirect(target);
        }

        evaluation.decision
    }

    /// Returns true while a redirect is in flight or cooling down.
    pub fn is_redirect_pending(&self) -> bool {
        self.inner.redirect_pending.load(Ordering::Acquire)
    }

    pub fn routes(&self) -> &RouteTable {
        &self.inner.routes
    }

    /// Cancel the cool-down timer. No redirect is issued afterwards.
    pub fn teardown(&self) {
        self.inner.shutdown.cancel();
        self.inner.redirect_pending.store(false, Ordering::Release);
    }

    /// Start a redirect unless one is already pending. Returns whether one started.
    fn redirect(&self, target: &str) -> bool {
        if self.inner.shutdown.is_cancelled() {
            return false;
        }
        if self
            .inner
            .redirect_pending
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!(route = %target, "Redirect already pending, not navigating");
            return false;
        }

        info!(route = %target, "Redirecting");
        let inner = Arc::clone(&self.inner);
        let target = target.to_string();
        tokio::spawn(async move {
            if let Err(e) = inner.navigator.navigate(&target).await {
                warn!(error = %e, "In-app navigation failed, falling back to hard navigation");
                inner.navigator.hard_navigate(&target);
            }

            tokio::select! {
                _ = inner.shutdown.cancelled() => {}
                _ = tokio::time::sleep(inner.cooldown) => {}
            }
            inner.redirect_pending.store(false, Ordering::Release);
        });
        true
    }
}
