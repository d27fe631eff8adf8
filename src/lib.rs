//! rclone-guard - run rclone under a single-instance lock
//!
//! rclone-guard wraps one rclone invocation in a cross-process advisory lock
//! on a well-known file, so overlapping runs from cron or a timer never step
//! on each other. Whoever holds the lock runs; everyone else waits, retrying
//! at a fixed interval, or gives up when their timeout expires.
//!
//! # Architecture
//!
//! - [`cli`] - Argument parsing, logging setup and command dispatch
//! - [`core`] - Lock file, polling, config file and default paths
//! - [`executor`] - The operation table and the rclone process runner
//! - [`exit_codes`] - Mapping from failures to process exit codes
//! - [`ui`] - Logging and result output
//!
//! # Guarantees
//!
//! 1. At most one caller per lock path runs its operation at a time
//! 2. The lock is released on every exit path of the guarded scope
//! 3. The lock file is removed on release, on a best-effort basis
//!
//! # Example
//!
//! ```no_run
//! use rclone_guard::core::ops::{LockOptions, ProcessLock};
//!
//! let options = LockOptions::default().with_timeout(std::time::Duration::from_secs(30));
//! ProcessLock::with_lock("/tmp/rclone-guard.pid", &options, |_lock| {
//!     // only one process at a time gets here
//! })?;
//! # Ok::<(), rclone_guard::core::ops::LockError>(())
//! ```

pub mod cli;
pub mod core;
pub mod executor;
pub mod exit_codes;
pub mod ui;
