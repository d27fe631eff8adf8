//! Exit code constants for the rclone-guard CLI.
//!
//! When rclone runs, its exit code is passed through verbatim. Everything
//! else maps to one of these:
//! - 1: Configuration error (missing rclone config, invalid config file)
//! - 74: Lock I/O failure (EX_IOERR)
//! - 75: Lock held by another process (EX_TEMPFAIL)
//! - 130 / 143: Interrupted by SIGINT / SIGTERM
//! - -20: rclone executable not found
//! - -30: Any other failure running rclone
//!
//! Negative codes reach the shell modulo 256 (236 and 226).

use crate::core::config::ConfigError;
use crate::core::ops::LockError;
use crate::executor::{ExecError, Signal};

/// Successful execution.
pub const SUCCESS: i32 = 0;

/// Configuration error: missing rclone config or invalid config file.
pub const CONFIG_ERROR: i32 = 1;

/// Lock file could not be opened or locked.
pub const LOCK_FAILURE: i32 = 74;

/// Another process holds the lock.
pub const LOCK_CONTENDED: i32 = 75;

/// The rclone executable was not found.
pub const EXECUTABLE_NOT_FOUND: i32 = -20;

/// rclone could not be run to completion for another reason.
pub const EXECUTION_FAILED: i32 = -30;

/// Exit code for a lock failure.
pub fn for_lock_error(err: &LockError) -> i32 {
    match err {
        LockError::Contended { .. } => LOCK_CONTENDED,
        LockError::Io { .. } => LOCK_FAILURE,
        // The signal itself is not recorded on the lock error.
        LockError::Interrupted { .. } => Signal::Interrupt.exit_code(),
        LockError::InvalidPollInterval => CONFIG_ERROR,
    }
}

/// Exit code for an executor failure.
pub fn for_exec_error(err: &ExecError) -> i32 {
    match err {
        ExecError::ConfigNotFound(_) => CONFIG_ERROR,
        ExecError::NotFound { .. } => EXECUTABLE_NOT_FOUND,
        ExecError::InvalidFlag { .. } | ExecError::Failed(_) => EXECUTION_FAILED,
        ExecError::Interrupted(signal) => signal.exit_code(),
    }
}

/// Exit code for any error surfaced by the CLI layer.
pub fn for_error(err: &anyhow::Error) -> i32 {
    if let Some(lock_err) = err.downcast_ref::<LockError>() {
        for_lock_error(lock_err)
    } else if let Some(exec_err) = err.downcast_ref::<ExecError>() {
        for_exec_error(exec_err)
    } else if err.downcast_ref::<ConfigError>().is_some() {
        CONFIG_ERROR
    } else {
        EXECUTION_FAILED
    }
}
