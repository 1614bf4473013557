//! Logging initialization for the console runtime.
//!
//! Output format is chosen by `CONSOLE_LOG_FORMAT`:
//! - `json`: structured JSONL written to `~/.loyalty-console/logs/console.jsonl`,
//!   mirrored to stderr
//! - anything else: compact stderr lines

use crate::ConfigResult;
use observability::{LogConfig, LogFormat};

const ENV_LOG_FORMAT: &str = "CONSOLE_LOG_FORMAT";

/// Initialize the logging system for the console runtime.
///
/// `RUST_LOG` takes precedence over `level` when set.
///
/// ```ignore
/// init_logging("info")?;
/// tracing::info!("Console runtime started");
/// ```
pub fn init_logging(level: &str) -> ConfigResult<()> {
    init_logging_with_service("console", level)
}

/// Initialize logging with a custom service name.
pub fn init_logging_with_service(service_name: &str, level: &str) -> ConfigResult<()> {
    let config = log_config(
        service_name,
        level,
        std::env::var(ENV_LOG_FORMAT).ok().as_deref(),
    );
    observability::init_with_config(config)?;
    Ok(())
}

fn log_config(service_name: &str, level: &str, format: Option<&str>) -> LogConfig {
    let format = format.map(LogFormat::parse).unwrap_or_default();
    LogConfig {
        service_name: service_name.into(),
        default_level: level.into(),
        also_stderr: format == LogFormat::JsonFile,
        format,
        ..Default::default()
    }
}
