//! executor
//!
//! Runs one rclone command and reports its outcome.
//!
//! # Modules
//!
//! - [`traits`] - The `Executor` trait and its request/response types
//! - [`operation`] - The table of operations exposed on the CLI
//! - [`rclone`] - Real implementation spawning the rclone binary
//! - [`signal`] - Interrupt and termination watching
//! - [`mock`] - In-memory executor for tests
//!
//! # Design
//!
//! The executor never touches the process lock. The CLI acquires the lock,
//! hands exactly one [`Invocation`] to an [`Executor`], and releases the lock
//! whatever the executor returns.

pub mod mock;
pub mod operation;
pub mod rclone;
pub mod signal;
pub mod traits;

pub use operation::Operation;
pub use rclone::RClone;
pub use signal::Signal;
pub use traits::{ExecError, ExecOutput, Executor, Invocation};
