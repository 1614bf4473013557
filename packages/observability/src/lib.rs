//! # Observability
//!
//! Logging initialization for the loyalty console runtime.
//!
//! Components are **log producers** only. They use the standard `tracing`
//! macros with structured fields and never configure where logs go. The host
//! calls [`init_with_config`] once at startup.
//!
//! Two output formats are supported:
//!
//! - `Compact`: human-readable lines on stderr (default)
//! - `JsonFile`: one JSON object per line appended to
//!   `~/.loyalty-console/logs/console.jsonl`, optionally mirrored to stderr
//!
//! Field values whose name looks like a secret (`credential`, `token`,
//! `secret`, `password`) are redacted by the JSON layer.
//!
//! ```rust,ignore
//! observability::init_with_config(observability::LogConfig {
//!     service_name: "console".into(),
//!     default_level: "debug".into(),
//!     format: observability::LogFormat::JsonFile,
//!     ..Default::default()
//! })?;
//! ```

mod file;
mod json_layer;

use std::path::PathBuf;
use thiserror::Error;

pub use json_layer::{JsonLayer, LogEntry};

/// Output format of the installed subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Compact human-readable lines on stderr.
    #[default]
    Compact,
    /// Structured JSONL appended to a log file.
    JsonFile,
}

impl LogFormat {
    /// Parse a format name; unknown names fall back to `Compact`.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "json" | "jsonl" | "json_file" => LogFormat::JsonFile,
            _ => LogFormat::Compact,
        }
    }
}

/// Configuration for the logging system.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Name of the service, included in every JSON log line.
    pub service_name: String,

    /// Default log level filter (e.g., "debug", "info", "warn").
    /// Can be overridden by `RUST_LOG` environment variable.
    pub default_level: String,

    /// Optional custom log file path for `JsonFile`.
    pub log_path: Option<PathBuf>,

    /// Mirror JSON output to stderr in compact form.
    pub also_stderr: bool,

    pub format: LogFormat,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            service_name: "console".into(),
            default_level: "info".into(),
            log_path: None,
            also_stderr: false,
            format: LogFormat::Compact,
        }
    }
}

/// Error raised while installing the subscriber.
#[derive(Error, Debug)]
pub enum ObservabilityError {
    /// Log file could not be created or opened.
    #[error("Failed to open log file {path}: {source}")]
    LogFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The home directory could not be determined for the default log path.
    #[error("Could not determine home directory")]
    NoHomeDir,

    /// A global subscriber was already installed.
    #[error("Subscriber already installed: {0}")]
    AlreadyInstalled(String),
}

/// Initialize with the default configuration for a named service.
pub fn init(service_name: &str) -> Result<(), ObservabilityError> {
    init_with_config(LogConfig {
        service_name: service_name.into(),
        ..Default::default()
    })
}

/// Install the global subscriber described by `config`.
pub fn init_with_config(config: LogConfig) -> Result<(), ObservabilityError> {
    match config.format {
        LogFormat::JsonFile => file::init_file_subscriber(&config),
        LogFormat::Compact => {
            use tracing_subscriber::util::SubscriberInitExt;
            tracing_subscriber::fmt()
                .with_env_filter(
                    tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                        tracing_subscriber::EnvFilter::new(&config.default_level)
                    }),
                )
                .with_target(true)
                .compact()
                .finish()
                .try_init()
                .map_err(|e| ObservabilityError::AlreadyInstalled(e.to_string()))
        }
    }
}

pub use tracing::{debug, error, info, instrument, trace, warn, Level};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LogConfig::default();
        assert_eq!(config.service_name, "console");
        assert_eq!(config.default_level, "info");
        assert!(config.log_path.is_none());
        assert!(!config.also_stderr);
        assert_eq!(config.format, LogFormat::Compact);
    }

    #[test]
    fn test_log_format_parse() {
        assert_eq!(LogFormat::parse("json"), LogFormat::JsonFile);
        assert_eq!(LogFormat::parse("JSONL"), LogFormat::JsonFile);
        assert_eq!(LogFormat::parse("compact"), LogFormat::Compact);
        assert_eq!(LogFormat::parse("pretty"), LogFormat::Compact);
    }
}
