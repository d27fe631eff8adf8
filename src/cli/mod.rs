//! cli
//!
//! Command-line interface layer for rclone-guard.
//!
//! # Responsibilities
//!
//! - Parse command-line arguments and global flags
//! - Install the logging subscriber
//! - Delegate to command handlers
//! - Report errors at the right level before `main` maps them to exit codes

pub mod args;
pub mod commands;

pub use args::{Cli, Shell};

use anyhow::Result;
use tracing::{error, warn};

use crate::core::ops::LockError;
use crate::executor::ExecError;
use crate::ui::output::{init_logging, Verbosity};

/// Run the CLI application.
///
/// This is the main entry point called from `main.rs`. Returns the exit code
/// of the guarded command.
pub fn run() -> Result<i32> {
    let cli = Cli::parse_args();
    init_logging(Verbosity::from_flags(cli.quiet, cli.verbose));

    commands::dispatch(cli)
}

/// Log an error that ended the run.
///
/// Losing the race for the lock is expected under cron and is logged as a
/// warning, as is being stopped by a signal; everything else is an error.
pub fn report_error(err: &anyhow::Error) {
    let expected = err
        .downcast_ref::<LockError>()
        .is_some_and(LockError::is_contended)
        || matches!(err.downcast_ref::<ExecError>(), Some(ExecError::Interrupted(_)));

    if expected {
        warn!("{:#}", err);
    } else {
        error!("{:#}", err);
    }
}
