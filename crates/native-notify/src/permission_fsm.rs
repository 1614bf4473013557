//! Notification permission state machine using rust-fsm.
//!
//! ```text
//!            Granted
//! Undecided ─────────► Granted (terminal)
//!   │  ▲
//!   │  └── Dismissed
//!   │
//!   └────────────────► Denied  (terminal)
//!            Denied
//! ```
//!
//! `Granted` and `Denied` only accept a repeat of themselves, so a platform
//! report that merely confirms the current state is not an error.

use rust_fsm::*;
use serde::{Deserialize, Serialize};

state_machine! {
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub permission_machine(Undecided)

    Undecided => {
        Granted => Granted,
        Denied => Denied,
        Dismissed => Undecided
    },
    Granted => {
        Granted => Granted
    },
    Denied => {
        Denied => Denied
    }
}

pub use permission_machine::Input as PermissionMachineInput;
pub use permission_machine::State as PermissionMachineState;
pub use permission_machine::StateMachine as PermissionMachine;

/// Host notification permission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionState {
    /// The user has not decided yet.
    #[default]
    Default,
    Granted,
    Denied,
}

impl PermissionState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, PermissionState::Default)
    }

    /// Input that moves the machine to this state.
    pub(crate) fn as_input(&self) -> PermissionMachineInput {
        match self {
            PermissionState::Default => PermissionMachineInput::Dismissed,
            PermissionState::Granted => PermissionMachineInput::Granted,
            PermissionState::Denied => PermissionMachineInput::Denied,
        }
    }
}

impl From<&PermissionMachineState> for PermissionState {
    fn from(state: &PermissionMachineState) -> Self {
        match state {
            PermissionMachineState::Undecided => PermissionState::Default,
            PermissionMachineState::Granted => PermissionState::Granted,
            PermissionMachineState::Denied => PermissionState::Denied,
        }
    }
}
