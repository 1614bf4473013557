//! Declarative per-view role policy.

use console_types::Role;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Role requirements a view declares.
///
/// `require_role` is stricter than `allowed_roles` and wins when both are set.
/// A policy with neither is unrestricted for elevated roles.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RoutePolicy {
    pub allowed_roles: HashSet<Role>,
    pub require_role: Option<Role>,
    /// Where to send a principal that fails the requirement. Defaults to the
    /// principal's role landing route.
    pub redirect_target: Option<String>,
}

impl RoutePolicy {
    /// No role restriction.
    pub fn open() -> Self {
        Self::default()
    }

    /// Exactly `role` may view.
    pub fn require(role: Role) -> Self {
        Self {
            require_role: Some(role),
            ..Self::default()
        }
    }

    /// Any of `roles` may view.
    pub fn allow(roles: impl IntoIterator<Item = Role>) -> Self {
        Self {
            allowed_roles: roles.into_iter().collect(),
            ..Self::default()
        }
    }

    pub fn redirect_to(mut self, route: impl Into<String>) -> Self {
        self.redirect_target = Some(route.into());
        self
    }

    /// Whether the policy explicitly admits the generic user role.
    pub fn allows_generic_user(&self) -> bool {
        self.require_role == Some(Role::User) || self.allowed_roles.contains(&Role::User)
    }
}
