//! core::config
//!
//! Configuration schema and loading.
//!
//! # Precedence
//!
//! Configuration values are resolved in this order (later overrides earlier):
//! 1. Default values
//! 2. Config file
//! 3. CLI flags (not handled here)
//!
//! # Config Locations
//!
//! Searched in order, first existing file wins:
//! 1. `$RCLONE_GUARD_CONFIG` if set
//! 2. `$XDG_CONFIG_HOME/rclone-guard/config.toml`
//! 3. `~/.rclone-guard/config.toml`
//!
//! # Example
//!
//! ```no_run
//! use rclone_guard::core::config::Config;
//!
//! let result = Config::load().unwrap();
//! let config = result.config;
//!
//! println!("rclone binary: {}", config.rclone_binary());
//! println!("lock path: {}", config.lock_path().display());
//! ```

pub mod schema;

pub use schema::GuardConfig;

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;

use crate::core::ops::PollInterval;
use crate::core::paths;

/// Default rclone executable.
pub const DEFAULT_RCLONE_BINARY: &str = "rclone";

/// Default rclone config file.
pub const DEFAULT_RCLONE_CONFIG: &str = "rclone.conf";

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("invalid config value: {0}")]
    InvalidValue(String),
}

/// Result of loading configuration.
#[derive(Debug)]
pub struct ConfigLoadResult {
    /// The loaded configuration.
    pub config: Config,
    /// The file it came from, if any.
    pub path: Option<PathBuf>,
}

/// Configuration with defaults applied through accessors.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Values read from the config file
    pub file: GuardConfig,
}

impl Config {
    /// Load configuration from the default locations.
    ///
    /// # Errors
    ///
    /// Returns an error if a config file exists but cannot be read, parsed,
    /// or validated. A missing config file is not an error.
    pub fn load() -> Result<ConfigLoadResult, ConfigError> {
        Self::load_from(&paths::default_config_candidates())
    }

    /// Load configuration from the first existing file in `candidates`.
    pub fn load_from(candidates: &[PathBuf]) -> Result<ConfigLoadResult, ConfigError> {
        for path in candidates {
            if path.is_file() {
                let file = Self::read_config(path)?;
                file.validate()?;
                return Ok(ConfigLoadResult {
                    config: Config { file },
                    path: Some(path.clone()),
                });
            }
        }

        Ok(ConfigLoadResult {
            config: Config::default(),
            path: None,
        })
    }

    /// Read and parse a config file.
    fn read_config(path: &Path) -> Result<GuardConfig, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    // =========================================================================
    // Accessor methods with defaults
    // =========================================================================

    /// Get the rclone executable.
    ///
    /// Defaults to "rclone" (resolved through `PATH`).
    pub fn rclone_binary(&self) -> &str {
        self.file
            .rclone_binary
            .as_deref()
            .unwrap_or(DEFAULT_RCLONE_BINARY)
    }

    /// Get the rclone config file.
    ///
    /// Defaults to "rclone.conf" in the working directory.
    pub fn rclone_config(&self) -> PathBuf {
        PathBuf::from(
            self.file
                .rclone_config
                .as_deref()
                .unwrap_or(DEFAULT_RCLONE_CONFIG),
        )
    }

    /// Get the lock file path.
    ///
    /// Defaults to [`paths::default_lock_path`].
    pub fn lock_path(&self) -> PathBuf {
        self.file
            .lock_path
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(paths::default_lock_path)
    }

    /// Get the pause between lock attempts.
    ///
    /// Defaults to 100ms. Zero is rejected when the file is loaded.
    pub fn poll_interval(&self) -> PollInterval {
        self.file
            .poll_interval_ms
            .and_then(|ms| PollInterval::from_millis(ms).ok())
            .unwrap_or_default()
    }

    /// Get the lock timeout.
    ///
    /// Defaults to `None` (wait forever).
    pub fn lock_timeout(&self) -> Option<Duration> {
        self.file
            .lock_timeout_secs
            .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
    }

    /// Get the default flags prepended to every invocation.
    pub fn flags(&self) -> &[String] {
        self.file.flags.as_deref().unwrap_or_default()
    }
}
