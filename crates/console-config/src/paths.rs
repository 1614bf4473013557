//! File system paths for the console runtime.

use crate::{ConfigError, ConfigResult};
use std::path::PathBuf;

/// Manages file system paths for the console runtime.
#[derive(Debug, Clone)]
pub struct Paths {
    /// Base directory (~/.loyalty-console)
    base_dir: PathBuf,
}

impl Paths {
    /// Create a new Paths instance rooted at `~/.loyalty-console`.
    pub fn new() -> ConfigResult<Self> {
        let home = dirs::home_dir()
            .ok_or_else(|| ConfigError::Path("Could not determine home directory".to_string()))?;
        Ok(Self {
            base_dir: home.join(".loyalty-console"),
        })
    }

    /// Create a new Paths instance with a custom base directory.
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Config file path (~/.loyalty-console/config.json).
    pub fn config_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Persisted key-value state (~/.loyalty-console/state.json).
    pub fn state_file(&self) -> PathBuf {
        self.base_dir.join("state.json")
    }

    pub fn logs_dir(&self) -> PathBuf {
        self.base_dir.join("logs")
    }

    /// JSONL log file (~/.loyalty-console/logs/console.jsonl).
    pub fn log_file(&self) -> PathBuf {
        self.logs_dir().join("console.jsonl")
    }

    /// Ensure all required directories exist.
    pub fn ensure_dirs(&self) -> ConfigResult<()> {
        std::fs::create_dir_all(&self.base_dir)?;
        std::fs::create_dir_all(self.logs_dir())?;
        Ok(())
    }
}
