//! Session management using FSM-based state tracking.
//!
//! `SessionManager` owns the session state machine and publishes every
//! change on a `watch` channel. The stored credential is read at
//! `initialize()` and verified in a background task so the first render is
//! never delayed.
//!
//! Each logout, successful login and verification start bumps the session
//! epoch. A verification task records the epoch it was spawned under and
//! drops its result when the epoch has moved on.

use crate::session_fsm::{SessionMachine, SessionMachineInput, SessionState};
use crate::{AuthError, AuthResult, IdentityApi};
use console_storage::{Credential, CredentialStore};
use console_types::{ApiError, ApiResult, FailureClass, Navigator, Principal};
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Owner of the session state.
///
/// Cheap to clone; clones share the same session.
#[derive(Clone)]
pub struct SessionManager {
    inner: Arc<Inner>,
}

struct Inner {
    credentials: CredentialStore,
    identity: Arc<dyn IdentityApi>,
    navigator: Arc<dyn Navigator>,
    sign_in_route: String,
    core: Mutex<Core>,
    state_tx: watch::Sender<SessionState>,
}

/// Everything mutated together under one lock.
struct Core {
    fsm: SessionMachine,
    epoch: u64,
    /// Explicit resets (logouts) only.
    resets: u64,
    last_principal: Option<Principal>,
}

impl SessionManager {
    pub fn new(
        credentials: CredentialStore,
        identity: Arc<dyn IdentityApi>,
        navigator: Arc<dyn Navigator>,
        sign_in_route: impl Into<String>,
    ) -> Self {
        let (state_tx, _) = watch::channel(SessionState::Unauthenticated);
        Self {
            inner: Arc::new(Inner {
                credentials,
                identity,
                navigator,
                sign_in_route: sign_in_route.into(),
                core: Mutex::new(Core {
                    fsm: SessionMachine::new(),
                    epoch: 0,
                    resets: 0,
                    last_principal: None,
                }),
                state_tx,
            }),
        }
    }

    /// Derive the session from the stored credential.
    ///
    /// Without a credential the session stays `Unauthenticated` and no
    /// network call is made. With one, the session moves to `Verifying` and
    /// verification runs on a spawned task whose handle is returned.
    pub fn initialize(&self) -> Option<JoinHandle<()>> {
        let credential = match self.inner.credentials.load() {
            Ok(credential) => credential,
            Err(e) => {
                warn!(error = %e, "Failed to read stored credential, treating as absent");
                None
            }
        };

        let Some(credential) = credential else {
            debug!("No stored credential");
            return None;
        };

        Some(self.start_verification(credential))
    }

    /// Re-run verification of the stored credential.
    ///
    /// Returns `None` when no credential is stored.
    pub fn revalidate(&self) -> Option<JoinHandle<()>> {
        match self.inner.credentials.load() {
            Ok(Some(credential)) => Some(self.start_verification(credential)),
            Ok(None) => None,
            Err(e) => {
                warn!(error = %e, "Failed to read stored credential");
                None
            }
        }
    }

    fn start_verification(&self, credential: Credential) -> JoinHandle<()> {
        let epoch = {
            let mut core = self.inner.core.lock();
            core.epoch += 1;
            if let Err(e) = self
                .inner
                .apply(&mut core, &SessionMachineInput::CredentialFound, SessionState::Verifying)
            {
                warn!(error = %e, "Could not enter verifying state");
            }
            core.epoch
        };

        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            let outcome = inner.identity.verify_identity(&credential).await;
            inner.finish_verification(epoch, outcome);
        })
    }

    /// Sign in with an identifier and secret.
    ///
    /// Blank input is rejected with a validation error before any call is
    /// made. Backend failures are returned untouched and leave the session
    /// as it was.
    pub async fn login(&self, identifier: &str, secret: &str) -> AuthResult<Principal> {
        if identifier.trim().is_empty() || secret.trim().is_empty() {
            return Err(ApiError::Validation("identifier and secret are required".into()).into());
        }

        let resets_before = self.inner.core.lock().resets;
        let grant = self.inner.identity.authenticate(identifier.trim(), secret).await?;

        let mut core = self.inner.core.lock();
        if core.resets != resets_before {
            debug!("Discarding login result after session reset");
            return Err(AuthError::Superseded);
        }

        self.inner.credentials.save(&grant.credential)?;
        core.epoch += 1;
        core.last_principal = Some(grant.principal.clone());
        self.inner.apply(
            &mut core,
            &SessionMachineInput::LoginSucceeded,
            SessionState::Authenticated(grant.principal.clone()),
        )?;
        info!(principal_id = %grant.principal.id, role = %grant.principal.role, "Logged in");
        Ok(grant.principal)
    }

    /// Purge the credential, reset the session and leave the application
    /// through a full-page navigation to the sign-in route.
    pub fn logout(&self) -> AuthResult<()> {
        let purged = {
            let mut core = self.inner.core.lock();
            let purged = self.inner.credentials.purge();
            core.epoch += 1;
            core.resets += 1;
            core.last_principal = None;
            self.inner
                .apply(&mut core, &SessionMachineInput::Reset, SessionState::Unauthenticated)?;
            purged
        };

        info!("Logged out");
        self.inner.navigator.hard_navigate(&self.inner.sign_in_route);
        purged?;
        Ok(())
    }

    pub fn state(&self) -> SessionState {
        self.inner.state_tx.borrow().clone()
    }

    pub fn principal(&self) -> Option<Principal> {
        self.inner.state_tx.borrow().principal().cloned()
    }

    /// Receiver that observes every state change.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.inner.state_tx.subscribe()
    }

    /// The stored credential, if any.
    pub fn credential(&self) -> Option<Credential> {
        self.inner.credentials.load().ok().flatten()
    }

    /// Current session epoch.
    pub fn epoch(&self) -> u64 {
        self.inner.core.lock().epoch
    }
}

impl Inner {
    /// Transition the FSM and publish the new state.
    fn apply(
        &self,
        core: &mut Core,
        input: &SessionMachineInput,
        next: SessionState,
    ) -> AuthResult<()> {
        let old_state = core.fsm.state().clone();
        core.fsm.consume(input).map_err(|_| {
            AuthError::InvalidStateTransition(format!(
                "Cannot apply {:?} in state {:?}",
                input, old_state
            ))
        })?;
        debug_assert_eq!(*core.fsm.state(), next.machine_state());

        debug!(
            old_state = ?old_state,
            new_state = next.name(),
            epoch = core.epoch,
            "Session state transition"
        );
        self.state_tx.send_replace(next);
        Ok(())
    }

    fn finish_verification(&self, epoch: u64, outcome: ApiResult<Principal>) {
        let mut core = self.core.lock();
        if core.epoch != epoch {
            debug!(epoch, current = core.epoch, "Discarding stale verification result");
            return;
        }

        let result = match outcome {
            Ok(principal) => {
                info!(principal_id = %principal.id, role = %principal.role, "Session verified");
                core.last_principal = Some(principal.clone());
                self.apply(
                    &mut core,
                    &SessionMachineInput::Verified,
                    SessionState::Authenticated(principal),
                )
            }
            Err(error) => match error.classify() {
                FailureClass::IdentityRejected => {
                    info!(error = %error, "Credential rejected, purging");
                    if let Err(e) = self.credentials.purge() {
                        warn!(error = %e, "Failed to purge rejected credential");
                    }
                    core.last_principal = None;
                    self.apply(
                        &mut core,
                        &SessionMachineInput::IdentityRejected,
                        SessionState::Unauthenticated,
                    )
                }
                FailureClass::AuthorizationOnly => {
                    debug!(error = %error, "Verification forbidden, identity accepted");
                    let principal = core.last_principal.clone().unwrap_or_else(Principal::placeholder);
                    self.apply(
                        &mut core,
                        &SessionMachineInput::AuthorizationOnly,
                        SessionState::Authenticated(principal),
                    )
                }
                FailureClass::Indeterminate => {
                    warn!(error = %error, "Verification indeterminate, continuing degraded");
                    let principal = core.last_principal.clone().unwrap_or_else(Principal::placeholder);
                    self.apply(
                        &mut core,
                        &SessionMachineInput::Indeterminate,
                        SessionState::DegradedAuthenticated(principal),
                    )
                }
            },
        };

        if let Err(e) = result {
            warn!(error = %e, "Verification result not applied");
        }
    }
}
