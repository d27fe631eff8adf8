//! rclone-guard: run one rclone command at a time.
//!
//! Parses arguments, runs the guarded command, and exits with rclone's exit
//! code or the code mapped from the error that stopped the run.

use std::process::ExitCode;

use rclone_guard::{cli, exit_codes};

fn main() -> ExitCode {
    let code = match cli::run() {
        Ok(code) => code,
        Err(err) => {
            cli::report_error(&err);
            exit_codes::for_error(&err)
        }
    };

    // Negative sentinels wrap modulo 256 like a C exit status.
    ExitCode::from(code as u8)
}
