//! Console roles.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Role of an authenticated principal.
///
/// `Admin` and `Merchant` are elevated roles. Any role string the backend
/// sends that is not recognized is treated as the generic `User` role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    /// Platform administrator.
    Admin,
    /// Merchant operator.
    Merchant,
    /// Generic end user.
    User,
}

impl Role {
    /// Returns true for roles that get basic access to every console view.
    pub fn is_elevated(&self) -> bool {
        matches!(self, Role::Admin | Role::Merchant)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Merchant => "merchant",
            Role::User => "user",
        }
    }
}

impl From<&str> for Role {
    fn from(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "admin" => Role::Admin,
            "merchant" => Role::Merchant,
            _ => Role::User,
        }
    }
}

impl From<String> for Role {
    fn from(raw: String) -> Self {
        Role::from(raw.as_str())
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        role.as_str().to_string()
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
