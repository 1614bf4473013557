//! Well-known console routes.

use console_types::Role;
use serde::{Deserialize, Serialize};

/// Sign-in entry point and the landing route of each role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouteTable {
    pub sign_in: String,
    pub admin_home: String,
    pub merchant_home: String,
    pub user_home: String,
}

impl Default for RouteTable {
    fn default() -> Self {
        Self {
            sign_in: "/login".to_string(),
            admin_home: "/dashboard".to_string(),
            merchant_home: "/merchant".to_string(),
            user_home: "/".to_string(),
        }
    }
}

impl RouteTable {
    /// Landing route for a role, used when a policy names no redirect target.
    pub fn default_route(&self, role: Role) -> &str {
        match role {
            Role::Admin => &self.admin_home,
            Role::Merchant => &self.merchant_home,
            Role::User => &self.user_home,
        }
    }

    pub fn is_sign_in(&self, route: &str) -> bool {
        strip_query(route) == self.sign_in
    }
}

fn strip_query(route: &str) -> &str {
    let end = route.find(['?', '#']).unwrap_or(route.len());
    let path = &route[..end];
    if path.len() > 1 {
        path.trim_end_matches('/')
    } else {
        path
    }
}

/// Compare two routes ignoring query strings, fragments and trailing slashes.
pub fn same_route(a: &str, b: &str) -> bool {
    strip_query(a) == strip_query(b)
}
