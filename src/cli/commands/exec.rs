//! exec command - Run one rclone operation under the process lock

use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::cli::args::Cli;
use crate::core::config::Config;
use crate::core::ops::{LockError, LockOptions, PollInterval, ProcessLock};
use crate::executor::signal::{Interruptible, Shutdown};
use crate::executor::{ExecError, ExecOutput, Executor, Invocation, Operation, RClone, Signal};
use crate::exit_codes;
use crate::ui::output;

/// Everything needed for one guarded run, with precedence applied.
#[derive(Debug, Clone, PartialEq)]
pub struct GuardedRun {
    /// Lock file path
    pub lock_path: PathBuf,
    /// Poll interval and timeout for acquiring the lock
    pub lock_options: LockOptions,
    /// rclone executable
    pub rclone_binary: String,
    /// rclone config file
    pub rclone_config: PathBuf,
    /// The single command to run while holding the lock
    pub invocation: Invocation,
    /// Print the result as JSON
    pub json: bool,
}

impl GuardedRun {
    /// Merge CLI flags over config file values over defaults.
    ///
    /// Config-file flags come before CLI flags so the CLI can override them.
    pub fn resolve(cli: &Cli, operation: Operation, config: &Config) -> Result<Self> {
        let poll_interval = match cli.poll_interval {
            Some(ms) => PollInterval::from_millis(ms)?,
            None => config.poll_interval(),
        };

        let lock_options = LockOptions {
            poll_interval,
            timeout: cli.lock_timeout.or_else(|| config.lock_timeout()),
        };

        let flags = config
            .flags()
            .iter()
            .chain(cli.flags.iter())
            .cloned()
            .collect();

        Ok(Self {
            lock_path: cli.lock_path.clone().unwrap_or_else(|| config.lock_path()),
            lock_options,
            rclone_binary: cli
                .rclone_binary
                .clone()
                .unwrap_or_else(|| config.rclone_binary().to_string()),
            rclone_config: cli.config.clone().unwrap_or_else(|| config.rclone_config()),
            invocation: Invocation::new(operation, cli.arguments.clone(), flags),
            json: cli.json,
        })
    }
}

/// Run the operation through rclone and return the process exit code.
///
/// The rclone config file is checked before the lock is taken, so a
/// misconfigured run never touches the lock file.
pub fn exec(run: &GuardedRun) -> Result<i32> {
    let rclone = RClone::new(&run.rclone_config, &run.rclone_binary)?;
    debug!(
        binary = rclone.binary(),
        config = %rclone.config_path().display(),
        "using rclone"
    );
    let output = run_guarded(run, &rclone)?;
    output::report(&output, run.json).context("failed to render result")?;
    Ok(output.code)
}

/// Acquire the lock, run exactly one invocation, release the lock.
///
/// Executor failures are folded into the returned output with their
/// sentinel exit code; only lock, signal and runtime failures are errors.
/// The lock is released before this function returns in every case.
///
/// SIGINT and SIGTERM are watched from before the lock file is created
/// until the lock is released. A signal while waiting abandons acquisition;
/// a signal while the operation runs kills it and releases the lock.
pub fn run_guarded(run: &GuardedRun, executor: &dyn Executor) -> Result<ExecOutput> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;

    let shutdown = {
        let _enter = runtime.enter();
        Shutdown::install().context("failed to listen for signals")?
    };
    let waiter = Interruptible::new(&runtime, shutdown);

    let lock = match ProcessLock::acquire_with_clock(&run.lock_path, &run.lock_options, &waiter) {
        Ok(lock) => lock,
        Err(err @ LockError::Interrupted { .. }) => {
            let signal = waiter.received().unwrap_or(Signal::Interrupt);
            return Err(
                anyhow::Error::new(ExecError::Interrupted(signal)).context(err.to_string())
            );
        }
        Err(err) => return Err(err.into()),
    };

    info!(
        lock = %lock.path().display(),
        operation = %run.invocation.operation,
        executor = executor.name(),
        "lock acquired, running operation"
    );

    let result = waiter
        .run(executor.execute(&run.invocation))
        .unwrap_or_else(|signal| Err(ExecError::Interrupted(signal)));

    debug!(held_for = ?lock.held_for(), "operation finished");
    lock.release();

    Ok(match result {
        Ok(output) => output,
        Err(err) => failure_output(&err),
    })
}

/// Describe an executor failure the same way as a completed command.
///
/// The message goes into `stderr`, which the caller reports.
fn failure_output(err: &ExecError) -> ExecOutput {
    ExecOutput {
        code: exit_codes::for_exec_error(err),
        stdout: String::new(),
        stderr: err.to_string(),
    }
}
