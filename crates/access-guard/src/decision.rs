//! Pure access decision.

use crate::RoutePolicy;
use console_config::{same_route, RouteTable};
use console_session::SessionState;
use console_types::Principal;

/// What the view layer should do for the current navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessDecision {
    Render,
    /// Session is still being verified.
    RenderLoading,
    /// Access is refused and no other route can resolve it.
    RenderDenied,
    Redirect(String),
}

impl AccessDecision {
    pub fn redirect_target(&self) -> Option<&str> {
        match self {
            AccessDecision::Redirect(target) => Some(target),
            _ => None,
        }
    }
}

/// A decision plus whether the stored credential must be purged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evaluation {
    pub decision: AccessDecision,
    pub purge_credential: bool,
}

impl Evaluation {
    fn keep(decision: AccessDecision) -> Self {
        Self {
            decision,
            purge_credential: false,
        }
    }
}

/// Decide access for `current_route` under `policy`.
///
/// Order of evaluation:
/// 1. `Verifying` renders a loading state.
/// 2. `Unauthenticated` renders the sign-in route and redirects everywhere else to it.
/// 3. Principals without basic access go to sign-in (or see it, when already
///    there); the credential is purged when the view does not admit generic users.
/// 4. `require_role`, then `allowed_roles`, then no restriction.
///
/// A redirect to the route being shown becomes `RenderDenied`.
pub fn evaluate(
    state: &SessionState,
    policy: &RoutePolicy,
    current_route: &str,
    routes: &RouteTable,
) -> Evaluation {
    let principal = match state {
        SessionState::Verifying => return Evaluation::keep(AccessDecision::RenderLoading),
        SessionState::Unauthenticated => {
            let decision = if routes.is_sign_in(current_route) {
                AccessDecision::Render
            } else {
                AccessDecision::Redirect(routes.sign_in.clone())
            };
            return Evaluation::keep(decision);
        }
        SessionState::Authenticated(p) | SessionState::DegradedAuthenticated(p) => p,
    };

    if !has_basic_access(principal, policy) {
        let decision = if routes.is_sign_in(current_route) {
            AccessDecision::Render
        } else {
            AccessDecision::Redirect(routes.sign_in.clone())
        };
        return Evaluation {
            decision,
            purge_credential: !policy.allows_generic_user(),
        };
    }

    let permitted = match (policy.require_role, policy.allowed_roles.is_empty()) {
        (Some(required), _) => principal.role == required,
        (None, false) => policy.allowed_roles.contains(&principal.role),
        (None, true) => true,
    };

    if permitted {
        return Evaluation::keep(AccessDecision::Render);
    }

    let target = policy
        .redirect_target
        .as_deref()
        .unwrap_or_else(|| routes.default_route(principal.role));
    Evaluation::keep(redirect_or_deny(target, current_route))
}

fn has_basic_access(principal: &Principal, policy: &RoutePolicy) -> bool {
    principal.role.is_elevated() || policy.allows_generic_user()
}

fn redirect_or_deny(target: &str, current_route: &str) -> AccessDecision {
    if same_route(target, current_route) {
        AccessDecision::RenderDenied
    } else {
        AccessDecision::Redirect(target.to_string())
    }
}
