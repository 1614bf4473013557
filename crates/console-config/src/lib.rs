//! Configuration, paths, route table and logging setup for the console runtime.

mod config;
mod error;
mod logging;
mod paths;
mod routes;
pub mod timing;

pub use config::{Config, DEFAULT_API_URL, DEFAULT_LOG_LEVEL};
pub use error::{ConfigError, ConfigResult};
pub use logging::{init_logging, init_logging_with_service};
pub use paths::Paths;
pub use routes::{same_route, RouteTable};
