//! Shared types for the loyalty console runtime.
//!
//! This crate provides:
//! - `Principal` / `PrincipalId`: the minimal authenticated identity
//! - `Role`: the three console roles and their elevation rules
//! - `ApiError` / `FailureClass`: backend failure taxonomy and classification
//! - `Navigator`: the host's navigation capability

mod error;
mod navigation;
mod principal;
mod role;

pub use error::{ApiError, ApiResult, FailureClass};
pub use navigation::{NavigationError, Navigator};
pub use principal::{Principal, PrincipalId, WireId, PLACEHOLDER_PRINCIPAL_ID};
pub use role::Role;
