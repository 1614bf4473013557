//! Access Guard: decides, per view, whether to render, wait, deny or redirect.
//!
//! [`evaluate`] is the pure decision. [`AccessGuard`] wraps it with the
//! side effects: the credential purge for views closed to generic users and
//! the debounced redirect navigation.

mod decision;
mod guard;
mod policy;

pub use decision::{evaluate, AccessDecision, Evaluation};
pub use guard::AccessGuard;
pub use policy::RoutePolicy;
