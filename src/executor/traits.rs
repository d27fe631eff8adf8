//! executor::traits
//!
//! Executor trait definition and the types that cross it.
//!
//! # Design
//!
//! The `Executor` trait is async because the real implementation waits on a
//! child process while also watching for interrupt signals. Outcomes are
//! split in two:
//!
//! - `Ok(ExecOutput)` - the tool ran and exited; its code may be non-zero
//! - `Err(ExecError)` - the tool could not be run to completion
//!
//! # Example
//!
//! ```ignore
//! use rclone_guard::executor::{ExecError, Executor, Invocation, Operation};
//!
//! async fn list(executor: &dyn Executor) -> Result<i32, ExecError> {
//!     let op: Operation = "lsd".parse().unwrap();
//!     let output = executor
//!         .execute(&Invocation::new(op, vec!["remote:".into()], vec![]))
//!         .await?;
//!     Ok(output.code)
//! }
//! ```

use std::io;
use std::path::PathBuf;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::operation::Operation;
use super::signal::Signal;

/// Errors that prevent a command from running to completion.
///
/// A command that runs and exits non-zero is not an error; see
/// [`ExecOutput::code`].
#[derive(Debug, Error)]
pub enum ExecError {
    /// The rclone config file does not exist or is not a file.
    #[error("could not find rclone config file: {}", .0.display())]
    ConfigNotFound(PathBuf),

    /// The executable could not be found.
    #[error("executable not found: {binary}")]
    NotFound {
        /// The program that was looked up
        binary: String,
        /// The spawn error
        #[source]
        source: io::Error,
    },

    /// A flag string could not be split into arguments.
    #[error("invalid flag '{flag}': {message}")]
    InvalidFlag {
        /// The offending flag string
        flag: String,
        /// Why it could not be split
        message: String,
    },

    /// Spawning or waiting on the command failed.
    #[error("error running command: {0}")]
    Failed(String),

    /// The wrapper received a signal while the command was running.
    #[error("interrupted by {0}")]
    Interrupted(Signal),
}

/// One command to run: an operation, its positional arguments, and flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// The operation to forward
    pub operation: Operation,
    /// Positional arguments, passed through verbatim
    pub arguments: Vec<String>,
    /// Flag strings, each split with shell quoting rules
    pub flags: Vec<String>,
}

impl Invocation {
    /// Create an invocation.
    pub fn new(operation: Operation, arguments: Vec<String>, flags: Vec<String>) -> Self {
        Self {
            operation,
            arguments,
            flags,
        }
    }
}

/// What a completed command produced.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecOutput {
    /// Exit code, passed through verbatim
    pub code: i32,
    /// Captured standard output
    pub stdout: String,
    /// Captured standard error
    pub stderr: String,
}

impl ExecOutput {
    /// Whether the command exited with code 0.
    pub fn success(&self) -> bool {
        self.code == 0
    }
}

/// Something that can run an [`Invocation`].
#[async_trait]
pub trait Executor: Send + Sync {
    /// Short name for logging.
    fn name(&self) -> &'static str;

    /// Run the invocation to completion.
    async fn execute(&self, invocation: &Invocation) -> Result<ExecOutput, ExecError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_serializes_as_result_object() {
        let output = ExecOutput {
            code: 3,
            stdout: String::new(),
            stderr: "directory not found".into(),
        };
        let json = serde_json::to_value(&output).unwrap();

        assert_eq!(json["code"], 3);
        assert_eq!(json["stderr"], "directory not found");
        assert!(!output.success());
    }

    #[test]
    fn error_display_formatting() {
        let err = ExecError::ConfigNotFound(PathBuf::from("rclone.conf"));
        assert!(err.to_string().contains("rclone.conf"));

        let err = ExecError::NotFound {
            binary: "rclone".into(),
            source: io::Error::from(io::ErrorKind::NotFound),
        };
        assert!(err.to_string().contains("not found"));

        let err = ExecError::Interrupted(Signal::Interrupt);
        assert!(err.to_string().contains("SIGINT"));
    }
}
