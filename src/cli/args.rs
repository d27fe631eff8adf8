//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Layout
//!
//! ```text
//! rclone-guard [OPTIONS] <OPERATION> [ARGUMENTS]... [--flags <FLAG>...]
//! ```
//!
//! `--flags` consumes every following word, including ones starting with a
//! hyphen, so it goes last.

use std::path::PathBuf;
use std::time::Duration;

use clap::{ArgAction, Parser};

use crate::executor::Operation;

/// rclone-guard - run rclone with a single-instance lock
#[derive(Parser, Debug)]
#[command(name = "rclone-guard")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "\
EXAMPLES:
    # Nightly sync; skip if the previous run is still going
    rclone-guard --lock-timeout 0 sync /data remote:backup --flags --fast-list

    # Wait up to five minutes for another run to finish
    rclone-guard -p /run/backup.pid --lock-timeout 300 copy /srv remote:srv

    # Multi-word rclone commands use an underscore or hyphen
    rclone-guard config_show myremote

EXIT CODES:
    rclone's own exit code, or
    1    config error        74   lock i/o error     75   already running
    130  interrupted         143  terminated
    -20  rclone not found    -30  rclone could not be run")]
pub struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Only show warnings and errors
    #[arg(short, long)]
    pub quiet: bool,

    /// Lock file guarding against concurrent runs
    #[arg(short = 'p', long = "pid", visible_alias = "lock-file", value_name = "PATH")]
    pub lock_path: Option<PathBuf>,

    /// rclone config file
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// rclone executable
    #[arg(long, value_name = "PATH")]
    pub rclone_binary: Option<String>,

    /// Seconds to wait for the lock; 0 fails at once if another run holds it
    #[arg(long, value_name = "SECONDS", value_parser = parse_seconds)]
    pub lock_timeout: Option<Duration>,

    /// Milliseconds between lock attempts
    #[arg(long, value_name = "MS", value_parser = clap::value_parser!(u64).range(1..))]
    pub poll_interval: Option<u64>,

    /// Print rclone's exit code and output as JSON on stdout
    #[arg(long)]
    pub json: bool,

    /// Print a shell completion script and exit
    #[arg(long, value_name = "SHELL", exclusive = true)]
    pub generate_completion: Option<Shell>,

    /// Flags passed through to rclone (must come last)
    #[arg(long, num_args = 1.., allow_hyphen_values = true, value_name = "FLAG")]
    pub flags: Vec<String>,

    /// rclone operation to run
    #[arg(value_enum, value_name = "OPERATION", hide_possible_values = true)]
    #[arg(required_unless_present = "generate_completion")]
    pub command: Option<Operation>,

    /// Arguments for the operation
    #[arg(value_name = "ARGUMENTS")]
    pub arguments: Vec<String>,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }
}

/// Parse a non-negative number of seconds, fractions allowed.
fn parse_seconds(value: &str) -> Result<Duration, String> {
    let secs: f64 = value
        .trim()
        .parse()
        .map_err(|_| format!("'{}' is not a number of seconds", value))?;
    Duration::try_from_secs_f64(secs).map_err(|_| format!("'{}' is not a valid timeout", value))
}

/// Supported shells for completion
#[derive(clap::ValueEnum, Debug, Clone, Copy)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("rclone-guard").chain(args.iter().copied()))
    }

    #[test]
    fn definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn operation_arguments_and_flags() {
        let cli = parse(&[
            "-p",
            "/tmp/guard.pid",
            "sync",
            "/data",
            "remote:data",
            "--flags",
            "--dry-run",
            "--transfers 8",
        ])
        .unwrap();

        assert_eq!(cli.lock_path, Some(PathBuf::from("/tmp/guard.pid")));
        assert_eq!(cli.command.unwrap().name(), "sync");
        assert_eq!(cli.arguments, ["/data", "remote:data"]);
        assert_eq!(cli.flags, ["--dry-run", "--transfers 8"]);
    }

    #[test]
    fn verbose_is_counted() {
        let cli = parse(&["-vvv", "version"]).unwrap();
        assert_eq!(cli.verbose, 3);
        assert!(!cli.quiet);
    }

    #[test]
    fn lock_file_alias_and_timeouts() {
        let cli = parse(&[
            "--lock-file",
            "/tmp/x.pid",
            "--lock-timeout",
            "1.5",
            "--poll-interval",
            "20",
            "lsd",
            "remote:",
        ])
        .unwrap();

        assert_eq!(cli.lock_path, Some(PathBuf::from("/tmp/x.pid")));
        assert_eq!(cli.lock_timeout, Some(Duration::from_millis(1500)));
        assert_eq!(cli.poll_interval, Some(20));
    }

    #[test]
    fn zero_timeout_is_allowed() {
        let cli = parse(&["--lock-timeout", "0", "version"]).unwrap();
        assert_eq!(cli.lock_timeout, Some(Duration::ZERO));
    }

    #[test]
    fn negative_timeout_is_rejected() {
        assert!(parse(&["--lock-timeout", "-1", "version"]).is_err());
        assert!(parse(&["--lock-timeout", "soon", "version"]).is_err());
    }

    #[test]
    fn zero_poll_interval_is_rejected() {
        assert!(parse(&["--poll-interval", "0", "version"]).is_err());
    }

    #[test]
    fn hyphenated_operation_alias() {
        let cli = parse(&["config-create", "myremote", "drive"]).unwrap();
        assert_eq!(cli.command.unwrap().words(), ["config", "create"]);
    }

    #[test]
    fn unknown_operation_is_rejected() {
        assert!(parse(&["frobnicate"]).is_err());
    }

    #[test]
    fn operation_is_required() {
        assert!(parse(&["-v"]).is_err());
    }

    #[test]
    fn completion_needs_no_operation() {
        let cli = parse(&["--generate-completion", "bash"]).unwrap();
        assert!(matches!(cli.generate_completion, Some(Shell::Bash)));
        assert!(cli.command.is_none());
    }
}
