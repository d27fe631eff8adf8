//! executor::rclone
//!
//! Executor that spawns the rclone binary.
//!
//! # Command Line
//!
//! ```text
//! <binary> --config=<config> <operation words...> <arguments...> <flags...>
//! ```
//!
//! Positional arguments are passed verbatim. Each flag string is split with
//! shell quoting rules, so `"--transfers 8"` becomes two arguments and
//! `"--exclude '*.tmp'"` keeps the pattern intact.
//!
//! # Interrupts
//!
//! The child is spawned with `kill_on_drop`, so dropping the `execute`
//! future kills it. The caller races that future against its signal
//! listeners (see [`Interruptible`](super::signal::Interruptible)).

use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Output, Stdio};

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use super::traits::{ExecError, ExecOutput, Executor, Invocation};
use crate::exit_codes;

/// Runs invocations through an rclone executable.
#[derive(Debug, Clone)]
pub struct RClone {
    /// rclone config file passed as `--config`
    config_path: PathBuf,
    /// Program to spawn, resolved through `PATH` if not a path
    binary: String,
}

impl RClone {
    /// Create an executor for `binary` using the rclone config at `config_path`.
    ///
    /// # Errors
    ///
    /// Returns [`ExecError::ConfigNotFound`] if `config_path` is not an
    /// existing regular file.
    pub fn new(config_path: impl Into<PathBuf>, binary: impl Into<String>) -> Result<Self, ExecError> {
        let config_path = config_path.into();
        if !config_path.is_file() {
            return Err(ExecError::ConfigNotFound(config_path));
        }

        Ok(Self {
            config_path,
            binary: binary.into(),
        })
    }

    /// The rclone config file.
    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// The program that will be spawned.
    pub fn binary(&self) -> &str {
        &self.binary
    }

    /// Build the full argv for an invocation, program first.
    ///
    /// # Errors
    ///
    /// Returns [`ExecError::InvalidFlag`] if a flag string has unbalanced
    /// quotes.
    pub fn build_command(&self, invocation: &Invocation) -> Result<Vec<String>, ExecError> {
        let mut argv = Vec::with_capacity(
            2 + invocation.operation.words().len()
                + invocation.arguments.len()
                + invocation.flags.len(),
        );

        argv.push(self.binary.clone());
        argv.push(format!("--config={}", self.config_path.display()));
        argv.extend(invocation.operation.words().iter().map(|w| w.to_string()));
        argv.extend(invocation.arguments.iter().cloned());

        for flag in &invocation.flags {
            let words = shell_words::split(flag).map_err(|e| ExecError::InvalidFlag {
                flag: flag.clone(),
                message: e.to_string(),
            })?;
            argv.extend(words);
        }

        Ok(argv)
    }
}

#[async_trait]
impl Executor for RClone {
    fn name(&self) -> &'static str {
        "rclone"
    }

    async fn execute(&self, invocation: &Invocation) -> Result<ExecOutput, ExecError> {
        let argv = self.build_command(invocation)?;
        debug!(?argv, "invoking rclone");

        let child = Command::new(&self.binary)
            .args(&argv[1..])
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    ExecError::NotFound {
                        binary: self.binary.clone(),
                        source: e,
                    }
                } else {
                    ExecError::Failed(format!("cannot start {}: {}", self.binary, e))
                }
            })?;

        let output = child
            .wait_with_output()
            .await
            .map_err(|e| ExecError::Failed(format!("cannot wait for {}: {}", self.binary, e)))?;
        Ok(to_exec_output(output))
    }
}

/// Convert captured process output, decoding text lossily.
fn to_exec_output(output: Output) -> ExecOutput {
    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

    if !stderr.is_empty() {
        debug!(%stderr, "rclone error output");
    }
    if !stdout.is_empty() {
        debug!(%stdout, "rclone output");
    }

    ExecOutput {
        code: exit_code(output.status),
        stdout,
        stderr,
    }
}

/// The exit code of a finished process.
///
/// A process killed by a signal has no code; on Unix it reports the shell
/// convention `128 + signal`.
fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }

    exit_codes::EXECUTION_FAILED
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::Operation;
    use std::fs;
    use tempfile::TempDir;

    fn rclone_with_config(temp: &TempDir, binary: &str) -> RClone {
        let config = temp.path().join("rclone.conf");
        fs::write(&config, "[remote]\ntype = local\n").expect("write rclone config");
        let rclone = RClone::new(config.clone(), binary).expect("construct rclone");

        assert_eq!(rclone.config_path(), config.as_path());
        assert_eq!(rclone.binary(), binary);
        rclone
    }

    fn invocation(op: &str, arguments: &[&str], flags: &[&str]) -> Invocation {
        Invocation::new(
            Operation::from_name(op).expect("known operation"),
            arguments.iter().map(|s| s.to_string()).collect(),
            flags.iter().map(|s| s.to_string()).collect(),
        )
    }

    #[test]
    fn missing_config_is_rejected() {
        let temp = TempDir::new().unwrap();
        let err = RClone::new(temp.path().join("absent.conf"), "rclone").unwrap_err();
        assert!(matches!(err, ExecError::ConfigNotFound(_)));
    }

    #[test]
    fn directory_config_is_rejected() {
        let temp = TempDir::new().unwrap();
        let err = RClone::new(temp.path(), "rclone").unwrap_err();
        assert!(matches!(err, ExecError::ConfigNotFound(_)));
    }

    #[test]
    fn command_line_layout() {
        let temp = TempDir::new().unwrap();
        let rclone = rclone_with_config(&temp, "rclone");

        let argv = rclone
            .build_command(&invocation(
                "sync",
                &["/data/photos", "remote:photos"],
                &["--dry-run", "--transfers 8"],
            ))
            .unwrap();

        let config_arg = format!("--config={}", temp.path().join("rclone.conf").display());
        assert_eq!(
            argv,
            vec![
                "rclone",
                config_arg.as_str(),
                "sync",
                "/data/photos",
                "remote:photos",
                "--dry-run",
                "--transfers",
                "8",
            ]
        );
    }

    #[test]
    fn nested_operation_and_arguments_with_spaces() {
        let temp = TempDir::new().unwrap();
        let rclone = rclone_with_config(&temp, "rclone");

        let argv = rclone
            .build_command(&invocation(
                "config_create",
                &["my remote", "drive"],
                &["--exclude '*.tmp files'"],
            ))
            .unwrap();

        assert_eq!(
            &argv[2..],
            ["config", "create", "my remote", "drive", "--exclude", "*.tmp files"]
        );
    }

    #[test]
    fn unbalanced_flag_quote_is_invalid() {
        let temp = TempDir::new().unwrap();
        let rclone = rclone_with_config(&temp, "rclone");

        let err = rclone
            .build_command(&invocation("ls", &[], &["--include 'oops"]))
            .unwrap_err();
        assert!(matches!(err, ExecError::InvalidFlag { .. }));
    }

    #[tokio::test]
    async fn missing_binary_is_not_found() {
        let temp = TempDir::new().unwrap();
        let rclone = rclone_with_config(&temp, "rclone-guard-test-no-such-binary");

        let err = rclone
            .execute(&invocation("version", &[], &[]))
            .await
            .unwrap_err();
        assert!(matches!(err, ExecError::NotFound { .. }));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn captures_output_and_exit_code() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        let script = temp.path().join("fake-rclone");
        fs::write(
            &script,
            "#!/bin/sh\necho \"args: $*\"\necho 'warning' >&2\nexit 3\n",
        )
        .unwrap();
        fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();

        let rclone = rclone_with_config(&temp, script.to_str().unwrap());
        let output = rclone
            .execute(&invocation("lsd", &["remote:"], &["--max-depth 1"]))
            .await
            .unwrap();

        assert_eq!(output.code, 3);
        assert!(output.stdout.contains("lsd remote: --max-depth 1"));
        assert_eq!(output.stderr, "warning\n");
    }

    #[cfg(unix)]
    #[test]
    fn signal_death_maps_to_shell_convention() {
        use std::os::unix::process::ExitStatusExt;

        // Raw wait status for "killed by SIGKILL".
        let status = ExitStatus::from_raw(9);
        assert_eq!(exit_code(status), 137);

        let status = ExitStatus::from_raw(2 << 8);
        assert_eq!(exit_code(status), 2);
    }
}
