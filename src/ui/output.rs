//! ui::output
//!
//! Logging setup and result reporting.
//!
//! # Design
//!
//! Log lines go to stderr with a timestamp and level. The level comes from
//! the `-v`/`-q` flags unless `RUST_LOG` is set, in which case `RUST_LOG`
//! wins. rclone's captured output is logged: stderr at ERROR, stdout at INFO.
//! With `--json` the full result is also printed to stdout.

use std::io::Write;

use tracing::level_filters::LevelFilter;
use tracing::{error, info, Level};
use tracing_subscriber::EnvFilter;

use crate::executor::ExecOutput;

/// Output verbosity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verbosity {
    /// Warnings and errors only
    Quiet,
    /// Informational messages (default)
    Normal,
    /// Debug messages
    Verbose,
    /// Everything, including lock retry attempts
    Trace,
}

impl Verbosity {
    /// Create verbosity from flags.
    ///
    /// Each `-v` raises the level by one, capped at [`Verbosity::Trace`].
    /// `-q` wins over any number of `-v`.
    pub fn from_flags(quiet: bool, verbose: u8) -> Self {
        if quiet {
            return Verbosity::Quiet;
        }
        match verbose {
            0 => Verbosity::Normal,
            1 => Verbosity::Verbose,
            _ => Verbosity::Trace,
        }
    }

    /// The maximum `tracing` level shown.
    pub fn level(self) -> Level {
        match self {
            Verbosity::Quiet => Level::WARN,
            Verbosity::Normal => Level::INFO,
            Verbosity::Verbose => Level::DEBUG,
            Verbosity::Trace => Level::TRACE,
        }
    }
}

/// Install the global `tracing` subscriber.
///
/// Calling this more than once is harmless; later calls are ignored.
pub fn init_logging(verbosity: Verbosity) {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(verbosity.level()).into())
        .from_env_lossy();

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Log rclone's captured output and, if requested, print it as JSON.
pub fn report(output: &ExecOutput, json: bool) -> serde_json::Result<()> {
    if !output.stderr.trim().is_empty() {
        error!("{}", output.stderr.trim_end());
    }
    if !output.stdout.trim().is_empty() {
        info!("{}", output.stdout.trim_end());
    }

    if json {
        let rendered = render_json(output)?;
        let mut stdout = std::io::stdout().lock();
        // A closed stdout (e.g. piped into `head`) is not worth failing over.
        let _ = writeln!(stdout, "{}", rendered);
    }

    Ok(())
}

/// Render a result as pretty-printed JSON.
pub fn render_json(output: &ExecOutput) -> serde_json::Result<String> {
    serde_json::to_string_pretty(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_info() {
        assert_eq!(Verbosity::from_flags(false, 0).level(), Level::INFO);
    }

    #[test]
    fn verbose_flag_is_capped() {
        assert_eq!(Verbosity::from_flags(false, 1), Verbosity::Verbose);
        assert_eq!(Verbosity::from_flags(false, 2), Verbosity::Trace);
        assert_eq!(Verbosity::from_flags(false, 200), Verbosity::Trace);
    }

    #[test]
    fn quiet_overrides_verbose() {
        assert_eq!(Verbosity::from_flags(true, 3), Verbosity::Quiet);
        assert_eq!(Verbosity::Quiet.level(), Level::WARN);
    }

    #[test]
    fn json_contains_all_fields() {
        let output = ExecOutput {
            code: 0,
            stdout: "remote:\n".into(),
            stderr: String::new(),
        };
        let rendered = render_json(&output).unwrap();
        let parsed: ExecOutput = serde_json::from_str(&rendered).unwrap();
        assert_eq!(parsed, output);
    }

    #[test]
    fn init_logging_twice_does_not_panic() {
        init_logging(Verbosity::Normal);
        init_logging(Verbosity::Trace);
    }
}
