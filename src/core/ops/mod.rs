//! core::ops
//!
//! Cross-process locking.
//!
//! # Modules
//!
//! - [`lock`] - Exclusive process lock on a file path
//! - [`poll`] - Polling driver with an injectable clock
//!
//! # Architecture
//!
//! Every guarded invocation:
//! 1. Acquires the process lock (polling while another process holds it)
//! 2. Runs exactly one rclone command
//! 3. Releases the lock on scope exit, whatever the command's outcome
//!
//! # Example
//!
//! ```ignore
//! use rclone_guard::core::ops::{LockOptions, ProcessLock};
//!
//! let lock = ProcessLock::acquire(&lock_path, &LockOptions::fail_fast())?;
//! // run the command
//! drop(lock);
//! ```

pub mod lock;
pub mod poll;

// Re-export main types for convenience
pub use lock::{LockError, LockOptions, PollInterval, ProcessLock};
pub use poll::{Clock, SystemClock};
