//! core::ops::lock
//!
//! Single-instance guard built on an advisory file lock.
//!
//! # Architecture
//!
//! The process lock ensures only one rclone-guard invocation runs at a time
//! for a given lock path, across independently started processes. It is made
//! of two layers:
//!
//! - [`try_lock`] - one non-blocking attempt: open (creating if needed) and
//!   `flock`-style exclusive lock via `fs2`. No timing logic.
//! - [`ProcessLock::acquire`] - drives `try_lock` through
//!   [`poll_until`](super::poll::poll_until), sleeping between attempts and
//!   enforcing the optional timeout.
//!
//! # Storage
//!
//! - `<lock path>` - zero-length file, never read or written; it only exists
//!   as a target for the OS lock.
//!
//! # Invariants
//!
//! - A `ProcessLock` value is always held; the unheld state is the absence
//!   of a value
//! - Release runs exactly once, on drop (RAII pattern), including during
//!   unwinding
//! - Release removes the file, unlocks, then closes, each step best-effort
//! - Contention ([`LockError::Contended`]) is distinct from I/O faults
//!   ([`LockError::Io`]); I/O faults are never retried
//!
//! Removing the file on release is racy: a waiter that opened the old file
//! before removal can be granted a lock on the unlinked inode while a newcomer
//! creates and locks a fresh file at the same path. Waiters re-open the path
//! on every attempt, which keeps that window to the holder's release.
//!
//! # Example
//!
//! ```no_run
//! use rclone_guard::core::ops::lock::{LockOptions, ProcessLock};
//! use std::time::Duration;
//!
//! let options = LockOptions::default().with_timeout(Duration::from_secs(5));
//! let _exit_code = ProcessLock::with_lock("/run/rclone-guard.pid", &options, |_lock| {
//!     // protected work
//!     0
//! })?;
//! # Ok::<(), rclone_guard::core::ops::lock::LockError>(())
//! ```

use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use fs2::FileExt;
use thiserror::Error;
use tracing::{debug, warn};

use super::poll::{poll_until, Attempt, Clock, PollError, SystemClock};

/// Default pause between acquisition attempts (100ms).
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Errors from locking operations.
#[derive(Debug, Error)]
pub enum LockError {
    /// Another process held the lock until the deadline passed.
    #[error("another process is already running (lock {} busy for {:?})", .path.display(), .waited)]
    Contended {
        /// The contended lock path.
        path: PathBuf,
        /// How long acquisition waited before giving up.
        waited: Duration,
    },

    /// The lock file could not be opened or locked.
    #[error("lock i/o error on {}: {}", .path.display(), .source)]
    Io {
        /// The lock path.
        path: PathBuf,
        /// The underlying OS error.
        #[source]
        source: io::Error,
    },

    /// Waiting was cancelled before the lock became free.
    #[error("interrupted while waiting for lock {} after {:?}", .path.display(), .waited)]
    Interrupted {
        /// The contended lock path.
        path: PathBuf,
        /// How long acquisition waited before stopping.
        waited: Duration,
    },

    /// A zero poll interval would busy-spin.
    #[error("poll interval must be greater than zero")]
    InvalidPollInterval,
}

impl LockError {
    /// True when the failure means "someone else is running".
    pub fn is_contended(&self) -> bool {
        matches!(self, LockError::Contended { .. })
    }
}

/// Failure of a single non-blocking attempt.
#[derive(Debug)]
pub enum TryLockError {
    /// Another handle holds the exclusive lock.
    WouldBlock,
    /// Opening or locking failed for another reason.
    Io(io::Error),
}

/// Pause between acquisition attempts. Always non-zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollInterval(Duration);

impl PollInterval {
    /// Create a poll interval, rejecting zero.
    pub fn new(interval: Duration) -> Result<Self, LockError> {
        if interval.is_zero() {
            return Err(LockError::InvalidPollInterval);
        }
        Ok(Self(interval))
    }

    /// Create a poll interval from milliseconds, rejecting zero.
    pub fn from_millis(millis: u64) -> Result<Self, LockError> {
        Self::new(Duration::from_millis(millis))
    }

    /// The interval as a `Duration`.
    pub fn get(self) -> Duration {
        self.0
    }
}

impl Default for PollInterval {
    fn default() -> Self {
        Self(DEFAULT_POLL_INTERVAL)
    }
}

/// How to acquire a [`ProcessLock`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LockOptions {
    /// Pause between attempts while the lock is busy.
    pub poll_interval: PollInterval,
    /// Give up after this long. `None` waits forever; `Some(ZERO)` fails
    /// on the first busy attempt.
    pub timeout: Option<Duration>,
}

impl LockOptions {
    /// Options that fail immediately if the lock is busy.
    pub fn fail_fast() -> Self {
        Self::default().with_timeout(Duration::ZERO)
    }

    /// Set the poll interval.
    pub fn with_poll_interval(mut self, interval: PollInterval) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Set the timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Make one non-blocking attempt to lock `path` exclusively.
///
/// The file is created if absent and never truncated. Its parent directory
/// is not created; a missing directory is reported as [`TryLockError::Io`].
pub fn try_lock(path: &Path) -> Result<File, TryLockError> {
    let file = OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(false)
        .open(path)
        .map_err(TryLockError::Io)?;

    match file.try_lock_exclusive() {
        Ok(()) => Ok(file),
        Err(e) if is_contended(&e) => Err(TryLockError::WouldBlock),
        Err(e) => Err(TryLockError::Io(e)),
    }
}

/// Whether a lock error means "held by someone else".
fn is_contended(err: &io::Error) -> bool {
    err.kind() == io::ErrorKind::WouldBlock
        || err.raw_os_error() == fs2::lock_contended_error().raw_os_error()
}

/// An exclusive, cross-process lock on a file path.
///
/// The lock is released when this guard is dropped. Release removes the lock
/// file, unlocks it, and closes the handle; failures are logged, not raised.
#[derive(Debug)]
pub struct ProcessLock {
    /// Path to the lock file.
    path: PathBuf,
    /// The locked handle. Only `None` while dropping.
    file: Option<File>,
    /// When the lock was granted.
    acquired_at: Instant,
}

impl ProcessLock {
    /// Acquire the lock at `path`, polling while another process holds it.
    ///
    /// # Errors
    ///
    /// - [`LockError::Contended`] if the timeout elapses while the lock is busy
    /// - [`LockError::Io`] if the file cannot be opened or locked
    pub fn acquire(path: impl AsRef<Path>, options: &LockOptions) -> Result<Self, LockError> {
        Self::acquire_with_clock(path, options, &SystemClock)
    }

    /// Like [`acquire`](Self::acquire), reading time from `clock`.
    ///
    /// Returns [`LockError::Interrupted`] if the clock reports itself
    /// cancelled while the lock is busy.
    pub fn acquire_with_clock<C: Clock + ?Sized>(
        path: impl AsRef<Path>,
        options: &LockOptions,
        clock: &C,
    ) -> Result<Self, LockError> {
        let path = path.as_ref();
        debug!(path = %path.display(), timeout = ?options.timeout, "acquiring process lock");

        let attempt = || match try_lock(path) {
            Ok(file) => Attempt::Ready(file),
            Err(TryLockError::WouldBlock) => Attempt::Busy,
            Err(TryLockError::Io(e)) => Attempt::Failed(e),
        };

        match poll_until(clock, options.poll_interval.get(), options.timeout, attempt) {
            Ok(file) => {
                debug!(path = %path.display(), "process lock acquired");
                Ok(Self {
                    path: path.to_path_buf(),
                    file: Some(file),
                    acquired_at: Instant::now(),
                })
            }
            Err(PollError::TimedOut { waited }) => Err(LockError::Contended {
                path: path.to_path_buf(),
                waited,
            }),
            Err(PollError::Failed(source)) => Err(LockError::Io {
                path: path.to_path_buf(),
                source,
            }),
            Err(PollError::Cancelled { waited }) => Err(LockError::Interrupted {
                path: path.to_path_buf(),
                waited,
            }),
        }
    }

    /// Acquire the lock, run `f` while holding it, then release.
    ///
    /// The lock is released when `f` returns, whatever it returns, and also
    /// if `f` panics. `f` is never called if acquisition fails.
    pub fn with_lock<T, F>(
        path: impl AsRef<Path>,
        options: &LockOptions,
        f: F,
    ) -> Result<T, LockError>
    where
        F: FnOnce(&ProcessLock) -> T,
    {
        let lock = Self::acquire(path, options)?;
        Ok(f(&lock))
    }

    /// Get the path to the lock file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// How long the lock has been held.
    pub fn held_for(&self) -> Duration {
        self.acquired_at.elapsed()
    }

    /// Release the lock now instead of at end of scope.
    pub fn release(self) {
        drop(self);
    }
}

impl Drop for ProcessLock {
    fn drop(&mut self) {
        let Some(file) = self.file.take() else {
            return;
        };

        // Best-effort: the file may already be gone or not ours to remove.
        if let Err(e) = fs::remove_file(&self.path) {
            debug!(path = %self.path.display(), error = %e, "could not remove lock file");
        }

        if let Err(e) = file.unlock() {
            warn!(path = %self.path.display(), error = %e, "failed to unlock process lock");
        }

        drop(file);
        debug!(
            path = %self.path.display(),
            held_for = ?self.held_for(),
            "process lock released"
        );
    }
}
