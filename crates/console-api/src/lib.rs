//! REST backend for the loyalty console runtime.
//!
//! [`HttpBackend`] implements the identity and notification capabilities
//! over HTTP with a bearer credential. Transport and status failures are
//! mapped onto `ApiError` so the session can classify them.

mod client;
mod error;
mod wire;

pub use client::HttpBackend;
pub use error::{ClientError, ClientResult};
