//! Session state machine using rust-fsm.
//!
//! ## State Diagram
//!
//! ```text
//!                    CredentialFound
//! Unauthenticated ───────────────────► Verifying ◄──┐ CredentialFound
//!      ▲   │                             │  │  │    │
//!      │   │ LoginSucceeded   Verified / │  │  │ Indeterminate
//!      │   │        AuthorizationOnly    │  │  ▼
//!      │   └──────────► Authenticated ◄──┘  │  DegradedAuthenticated
//!      │                                    │
//!      └──────── IdentityRejected ──────────┘
//!
//! Reset: any state ──► Unauthenticated
//! LoginSucceeded: any state ──► Authenticated
//! ```

use console_types::Principal;
use rust_fsm::*;
use serde::{Deserialize, Serialize};

state_machine! {
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub session_machine(Unauthenticated)

    Unauthenticated => {
        CredentialFound => Verifying,
        LoginSucceeded => Authenticated,
        Reset => Unauthenticated
    },
    Verifying => {
        // A newer verification supersedes the pending one
        CredentialFound => Verifying,
        Verified => Authenticated,
        AuthorizationOnly => Authenticated,
        IdentityRejected => Unauthenticated,
        Indeterminate => DegradedAuthenticated,
        LoginSucceeded => Authenticated,
        Reset => Unauthenticated
    },
    Authenticated => {
        CredentialFound => Verifying,
        LoginSucceeded => Authenticated,
        Reset => Unauthenticated
    },
    DegradedAuthenticated => {
        CredentialFound => Verifying,
        LoginSucceeded => Authenticated,
        Reset => Unauthenticated
    }
}

pub use session_machine::Input as SessionMachineInput;
pub use session_machine::State as SessionMachineState;
pub use session_machine::StateMachine as SessionMachine;

/// Observable session value.
///
/// `DegradedAuthenticated` means a credential is stored and presumed valid,
/// but the last verification could neither confirm nor reject it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "principal", rename_all = "snake_case")]
pub enum SessionState {
    Unauthenticated,
    Verifying,
    Authenticated(Principal),
    DegradedAuthenticated(Principal),
}

impl SessionState {
    /// Returns true for `Authenticated` and `DegradedAuthenticated`.
    pub fn is_authenticated(&self) -> bool {
        matches!(
            self,
            SessionState::Authenticated(_) | SessionState::DegradedAuthenticated(_)
        )
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, SessionState::DegradedAuthenticated(_))
    }

    pub fn principal(&self) -> Option<&Principal> {
        match self {
            SessionState::Authenticated(p) | SessionState::DegradedAuthenticated(p) => Some(p),
            _ => None,
        }
    }

    /// The FSM state this value corresponds to.
    pub fn machine_state(&self) -> SessionMachineState {
        match self {
            SessionState::Unauthenticated => SessionMachineState::Unauthenticated,
            SessionState::Verifying => SessionMachineState::Verifying,
            SessionState::Authenticated(_) => SessionMachineState::Authenticated,
            SessionState::DegradedAuthenticated(_) => SessionMachineState::DegradedAuthenticated,
        }
    }

    /// Short name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            SessionState::Unauthenticated => "unauthenticated",
            SessionState::Verifying => "verifying",
            SessionState::Authenticated(_) => "authenticated",
            SessionState::DegradedAuthenticated(_) => "degraded_authenticated",
        }
    }
}
