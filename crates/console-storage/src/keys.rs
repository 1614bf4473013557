//! Storage key constants.

/// Keys persisted by the console runtime.
pub struct StorageKeys;

impl StorageKeys {
    /// Opaque bearer credential of the signed-in principal.
    pub const CREDENTIAL: &'static str = "console.credential";
}
