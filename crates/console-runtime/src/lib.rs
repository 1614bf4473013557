//! Loyalty console client runtime.
//!
//! Wires the session manager, access guard, notification aggregator and
//! native notification bridge together:
//!
//! ```text
//! CredentialStore ─► SessionManager ─┬─► AccessGuard
//!                                    └─► NotificationAggregator ─► NotificationBridge
//!                                              ▲
//!                                         LiveTransport
//! ```
//!
//! The session is the single source of truth. [`ConsoleRuntime`] follows its
//! state and drives the live channel and the permission strategy from it.

mod context;
mod error;
mod runtime;
mod view;

pub use context::{Backends, SessionContext};
pub use error::{RuntimeError, RuntimeResult};
pub use runtime::ConsoleRuntime;
pub use view::ViewState;

pub use access_guard::{AccessDecision, RoutePolicy};
pub use console_session::SessionState;
pub use native_notify::{InteractionKind, PermissionState};
pub use notification_feed::{FeedView, Notification};
