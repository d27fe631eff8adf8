//! core::paths
//!
//! Default locations for rclone-guard files.
//!
//! # Storage Layout
//!
//! - Lock file: `$XDG_RUNTIME_DIR/rclone-guard.pid`, falling back to
//!   `/var/run/rclone-guard.pid` on Unix and the temp directory elsewhere
//! - Config file, first existing of:
//!   1. `$RCLONE_GUARD_CONFIG`
//!   2. `$XDG_CONFIG_HOME/rclone-guard/config.toml`
//!   3. `~/.rclone-guard/config.toml`
//!
//! # Example
//!
//! ```
//! use rclone_guard::core::paths::lock_path_in;
//! use std::path::{Path, PathBuf};
//!
//! assert_eq!(
//!     lock_path_in(Some(Path::new("/run/user/1000"))),
//!     PathBuf::from("/run/user/1000/rclone-guard.pid")
//! );
//! ```

use std::path::{Path, PathBuf};

/// Directory and file stem used for all rclone-guard storage.
pub const APP_NAME: &str = "rclone-guard";

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "RCLONE_GUARD_CONFIG";

/// File name of the lock file in the runtime directory.
pub const LOCK_FILE_NAME: &str = "rclone-guard.pid";

/// The default lock path for this machine and user.
pub fn default_lock_path() -> PathBuf {
    lock_path_in(dirs::runtime_dir().as_deref())
}

/// The lock path under `runtime_dir`, or the system fallback when there is
/// no per-user runtime directory.
pub fn lock_path_in(runtime_dir: Option<&Path>) -> PathBuf {
    match runtime_dir {
        Some(dir) => dir.join(LOCK_FILE_NAME),
        None => fallback_runtime_dir().join(LOCK_FILE_NAME),
    }
}

#[cfg(unix)]
fn fallback_runtime_dir() -> PathBuf {
    PathBuf::from("/var/run")
}

#[cfg(not(unix))]
fn fallback_runtime_dir() -> PathBuf {
    std::env::temp_dir()
}

/// Config file locations in search order.
///
/// `env` looks up an environment variable; `home` is the user's home
/// directory. Both are parameters so the search order can be tested without
/// touching the process environment.
pub fn config_candidates<F>(env: F, home: Option<&Path>) -> Vec<PathBuf>
where
    F: Fn(&str) -> Option<String>,
{
    let mut candidates = Vec::new();

    if let Some(explicit) = env(CONFIG_ENV).filter(|v| !v.is_empty()) {
        candidates.push(PathBuf::from(explicit));
    }
    if let Some(xdg_home) = env("XDG_CONFIG_HOME").filter(|v| !v.is_empty()) {
        candidates.push(PathBuf::from(xdg_home).join(APP_NAME).join("config.toml"));
    }
    if let Some(home) = home {
        candidates.push(home.join(format!(".{}", APP_NAME)).join("config.toml"));
    }

    candidates
}

/// Config file locations for the current process environment.
pub fn default_config_candidates() -> Vec<PathBuf> {
    config_candidates(|key| std::env::var(key).ok(), dirs::home_dir().as_deref())
}
