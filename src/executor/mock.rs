//! executor::mock
//!
//! Mock executor implementation for deterministic testing.
//!
//! # Design
//!
//! The mock executor records every invocation it receives and answers with a
//! configured outcome. It never spawns a process.
//!
//! # Example
//!
//! ```
//! use rclone_guard::executor::mock::MockExecutor;
//! use rclone_guard::executor::{ExecOutput, Executor, Invocation, Operation};
//!
//! # tokio_test::block_on(async {
//! let executor = MockExecutor::new().with_output(ExecOutput {
//!     code: 0,
//!     stdout: "remote:\n".into(),
//!     stderr: String::new(),
//! });
//!
//! let op = Operation::from_name("listremotes").unwrap();
//! let output = executor.execute(&Invocation::new(op, vec![], vec![])).await.unwrap();
//!
//! assert_eq!(output.stdout, "remote:\n");
//! assert_eq!(executor.invocations().len(), 1);
//! # });
//! ```

use async_trait::async_trait;
use std::io;
use std::sync::{Arc, Mutex};

use super::signal::Signal;
use super::traits::{ExecError, ExecOutput, Executor, Invocation};

/// Outcome the mock answers with.
#[derive(Debug, Clone)]
pub enum MockOutcome {
    /// The command ran and produced this output.
    Output(ExecOutput),
    /// The executable was not found.
    NotFound,
    /// Running the command failed.
    Failed(String),
    /// A signal interrupted the command.
    Interrupted(Signal),
}

/// Mock executor for testing.
///
/// Thread-safe via internal `Arc<Mutex<...>>` wrapping.
#[derive(Debug, Clone)]
pub struct MockExecutor {
    inner: Arc<Mutex<MockExecutorInner>>,
}

#[derive(Debug)]
struct MockExecutorInner {
    outcome: MockOutcome,
    invocations: Vec<Invocation>,
}

impl Default for MockExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl MockExecutor {
    /// A mock that answers every invocation with exit code 0 and no output.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(MockExecutorInner {
                outcome: MockOutcome::Output(ExecOutput::default()),
                invocations: Vec::new(),
            })),
        }
    }

    /// Answer with `output`.
    pub fn with_output(self, output: ExecOutput) -> Self {
        self.with_outcome(MockOutcome::Output(output))
    }

    /// Answer with `outcome`.
    pub fn with_outcome(self, outcome: MockOutcome) -> Self {
        self.lock_inner().outcome = outcome;
        self
    }

    /// Every invocation received so far.
    pub fn invocations(&self) -> Vec<Invocation> {
        self.lock_inner().invocations.clone()
    }

    fn lock_inner(&self) -> std::sync::MutexGuard<'_, MockExecutorInner> {
        // A panic while holding the guard only poisons test state.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl Executor for MockExecutor {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn execute(&self, invocation: &Invocation) -> Result<ExecOutput, ExecError> {
        let mut inner = self.lock_inner();
        inner.invocations.push(invocation.clone());

        match &inner.outcome {
            MockOutcome::Output(output) => Ok(output.clone()),
            MockOutcome::NotFound => Err(ExecError::NotFound {
                binary: "mock".into(),
                source: io::Error::from(io::ErrorKind::NotFound),
            }),
            MockOutcome::Failed(message) => Err(ExecError::Failed(message.clone())),
            MockOutcome::Interrupted(signal) => Err(ExecError::Interrupted(*signal)),
        }
    }
}
