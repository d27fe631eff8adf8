//! cli::commands
//!
//! Command dispatch and handlers.
//!
//! There are two paths: print a completion script, or run one rclone
//! operation under the process lock. The second path loads the config file
//! first so a broken config never touches the lock.

mod completion;
mod exec;

pub use completion::completion;
pub use exec::{exec, run_guarded, GuardedRun};

use anyhow::{Context, Result};
use tracing::debug;

use crate::cli::args::Cli;
use crate::core::config::Config;
use crate::exit_codes;

/// Dispatch parsed arguments to a command handler.
///
/// Returns the process exit code on success.
pub fn dispatch(cli: Cli) -> Result<i32> {
    if let Some(shell) = cli.generate_completion {
        completion(shell)?;
        return Ok(exit_codes::SUCCESS);
    }

    let operation = cli.command.context("no operation given; see --help")?;

    let loaded = Config::load()?;
    match &loaded.path {
        Some(path) => debug!(config = %path.display(), "loaded config file"),
        None => debug!("no config file found, using defaults"),
    }

    let run = GuardedRun::resolve(&cli, operation, &loaded.config)?;
    debug!(
        lock = %run.lock_path.display(),
        poll_interval = ?run.lock_options.poll_interval.get(),
        timeout = ?run.lock_options.timeout,
        "resolved lock options"
    );

    exec(&run)
}
