//! Shared fixtures for integration tests.
//!
//! A [`Sandbox`] is a temp dir holding an rclone config, a fake rclone
//! script and a lock path. Every command it builds points HOME, the XDG
//! config dir and the guard's config variable into the sandbox so a real
//! user config can never leak into a test.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};

use assert_cmd::cargo::CommandCargoExt;
use tempfile::TempDir;

/// Fake rclone: echoes its argv, optionally touches a marker, sleeps and
/// exits with a chosen code.
const FAKE_RCLONE: &str = r#"#!/bin/sh
echo "args: $*"
if [ -n "$FAKE_RCLONE_STDERR" ]; then
    echo "$FAKE_RCLONE_STDERR" >&2
fi
if [ -n "$FAKE_RCLONE_MARKER" ]; then
    touch "$FAKE_RCLONE_MARKER"
fi
sleep "${FAKE_RCLONE_SLEEP:-0}"
exit "${FAKE_RCLONE_EXIT:-0}"
"#;

pub struct Sandbox {
    dir: TempDir,
}

impl Sandbox {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("failed to create temp dir");
        fs::write(dir.path().join("rclone.conf"), "[local]\ntype = local\n")
            .expect("failed to write rclone config");

        let script = dir.path().join("fake-rclone");
        fs::write(&script, FAKE_RCLONE).expect("failed to write fake rclone");
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&script, fs::Permissions::from_mode(0o755))
                .expect("failed to make fake rclone executable");
        }

        Self { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn rclone_config(&self) -> PathBuf {
        self.path().join("rclone.conf")
    }

    pub fn fake_rclone(&self) -> PathBuf {
        self.path().join("fake-rclone")
    }

    pub fn lock_path(&self) -> PathBuf {
        self.path().join("guard.pid")
    }

    pub fn marker(&self) -> PathBuf {
        self.path().join("running")
    }

    /// Where the guard looks for its own config file.
    pub fn guard_config(&self) -> PathBuf {
        self.path().join("guard.toml")
    }

    /// The guard binary with an isolated environment and no arguments.
    pub fn bare_command(&self) -> std::process::Command {
        let mut cmd =
            std::process::Command::cargo_bin("rclone-guard").expect("binary should be built");
        cmd.env("HOME", self.path())
            .env("XDG_CONFIG_HOME", self.path().join("xdg"))
            .env("RCLONE_GUARD_CONFIG", self.guard_config())
            .env_remove("RUST_LOG")
            .env("FAKE_RCLONE_MARKER", self.marker());
        cmd
    }

    /// The guard binary wired to the fake rclone, config and lock path.
    pub fn command(&self) -> std::process::Command {
        let mut cmd = self.bare_command();
        cmd.arg("-p")
            .arg(self.lock_path())
            .arg("-c")
            .arg(self.rclone_config())
            .arg("--rclone-binary")
            .arg(self.fake_rclone());
        cmd
    }

    /// Block until the fake rclone has started, failing after ten seconds.
    pub fn wait_for_marker(&self) {
        let deadline = Instant::now() + Duration::from_secs(10);
        while !self.marker().exists() {
            assert!(Instant::now() < deadline, "fake rclone never started");
            thread::sleep(Duration::from_millis(20));
        }
    }
}
