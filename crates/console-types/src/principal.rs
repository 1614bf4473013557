//! Authenticated identity.

use crate::Role;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Id given to the principal synthesized when verification is indeterminate.
pub const PLACEHOLDER_PRINCIPAL_ID: &str = "placeholder";

/// Identifier of a principal.
///
/// The backend is free to send ids as JSON strings or numbers; both are
/// normalized to their string form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "WireId", into = "String")]
pub struct PrincipalId(String);

impl PrincipalId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PrincipalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<PrincipalId> for String {
    fn from(id: PrincipalId) -> Self {
        id.0
    }
}

impl From<WireId> for PrincipalId {
    fn from(raw: WireId) -> Self {
        Self(raw.into_string())
    }
}

/// An id as it appears on the wire: either a string or an integer.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum WireId {
    Text(String),
    Number(i64),
}

impl WireId {
    pub fn into_string(self) -> String {
        match self {
            WireId::Text(s) => s,
            WireId::Number(n) => n.to_string(),
        }
    }
}

/// Minimal identity record of the authenticated user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub id: PrincipalId,
    #[serde(alias = "displayName", alias = "name", alias = "username")]
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default = "default_role")]
    pub role: Role,
}

fn default_role() -> Role {
    Role::User
}

impl Principal {
    pub fn new(id: impl Into<String>, display_name: impl Into<String>, role: Role) -> Self {
        Self {
            id: PrincipalId::new(id),
            display_name: display_name.into(),
            email: None,
            role,
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Principal synthesized when the backend could neither confirm nor
    /// reject the stored credential.
    ///
    /// Carries the admin role so a working user keeps full access while the
    /// backend is unreachable.
    pub fn placeholder() -> Self {
        Self::new(PLACEHOLDER_PRINCIPAL_ID, "Admin", Role::Admin)
    }

    pub fn is_placeholder(&self) -> bool {
        self.id.as_str() == PLACEHOLDER_PRINCIPAL_ID
    }
}
