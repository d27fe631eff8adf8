//! core::config::schema
//!
//! Configuration schema types.
//!
//! # Validation
//!
//! Config values are validated after parsing: the poll interval must be
//! non-zero, the rclone binary must be non-empty, and every default flag must
//! be splittable with shell quoting rules.

use serde::{Deserialize, Serialize};

use super::ConfigError;

/// rclone-guard configuration file.
///
/// # Example
///
/// ```toml
/// rclone_binary = "/usr/bin/rclone"
/// rclone_config = "/etc/rclone/rclone.conf"
/// lock_path = "/run/rclone-guard.pid"
/// poll_interval_ms = 250
/// lock_timeout_secs = 30
/// flags = ["--fast-list", "--transfers 8"]
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct GuardConfig {
    /// Executable to invoke
    pub rclone_binary: Option<String>,

    /// rclone config file passed as `--config`
    pub rclone_config: Option<String>,

    /// Lock file path
    pub lock_path: Option<String>,

    /// Pause between lock attempts, in milliseconds
    pub poll_interval_ms: Option<u64>,

    /// Give up waiting for the lock after this many seconds
    pub lock_timeout_secs: Option<f64>,

    /// Flags prepended to every invocation's `--flags`
    pub flags: Option<Vec<String>>,
}

impl GuardConfig {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.poll_interval_ms == Some(0) {
            return Err(ConfigError::InvalidValue(
                "poll_interval_ms must be greater than zero".into(),
            ));
        }

        if let Some(timeout) = self.lock_timeout_secs {
            if !timeout.is_finite() || timeout < 0.0 {
                return Err(ConfigError::InvalidValue(format!(
                    "lock_timeout_secs must be a non-negative number, got {}",
                    timeout
                )));
            }
        }

        if let Some(binary) = &self.rclone_binary {
            if binary.trim().is_empty() {
                return Err(ConfigError::InvalidValue(
                    "rclone_binary cannot be empty".into(),
                ));
            }
        }

        for flag in self.flags.iter().flatten() {
            shell_words::split(flag).map_err(|e| {
                ConfigError::InvalidValue(format!("cannot parse flag '{}': {}", flag, e))
            })?;
        }

        Ok(())
    }
}
