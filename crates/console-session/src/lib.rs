//! Session management for the loyalty console runtime.
//!
//! This crate provides:
//! - `SessionManager`: derives the session from the stored credential plus a
//!   verification call, and handles login/logout
//! - `SessionState`: the observable session value
//! - `IdentityApi`: the identity capability consumed from the backend

mod api;
mod error;
mod session;
mod session_fsm;

pub use api::{IdentityApi, LoginGrant};
pub use error::{AuthError, AuthResult};
pub use session::SessionManager;
pub use session_fsm::{SessionMachine, SessionMachineInput, SessionMachineState, SessionState};
