//! executor::operation
//!
//! The operations rclone-guard exposes, and the rclone subcommand words each
//! one forwards to.
//!
//! Names match rclone's own command names, with multi-word commands joined by
//! an underscore (`config_create` runs `rclone config create`). Underscored
//! names also accept a hyphenated alias (`config-create`).

use std::fmt;
use std::str::FromStr;

use clap::builder::PossibleValue;
use clap::ValueEnum;

/// A named rclone operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Operation {
    name: &'static str,
    alias: Option<&'static str>,
    words: &'static [&'static str],
}

const fn op(name: &'static str, words: &'static [&'static str]) -> Operation {
    Operation {
        name,
        alias: None,
        words,
    }
}

const fn nested(
    name: &'static str,
    alias: &'static str,
    words: &'static [&'static str],
) -> Operation {
    Operation {
        name,
        alias: Some(alias),
        words,
    }
}

/// Every supported operation, in CLI help order.
pub static OPERATIONS: &[Operation] = &[
    op("about", &["about"]),
    op("authorize", &["authorize"]),
    op("cachestats", &["cachestats"]),
    op("cat", &["cat"]),
    op("check", &["check"]),
    op("cleanup", &["cleanup"]),
    op("config", &["config"]),
    nested("config_create", "config-create", &["config", "create"]),
    nested("config_delete", "config-delete", &["config", "delete"]),
    nested("config_disconnect", "config-disconnect", &["config", "disconnect"]),
    nested("config_dump", "config-dump", &["config", "dump"]),
    nested("config_edit", "config-edit", &["config", "edit"]),
    nested("config_file", "config-file", &["config", "file"]),
    nested("config_password", "config-password", &["config", "password"]),
    nested("config_providers", "config-providers", &["config", "providers"]),
    nested("config_reconnect", "config-reconnect", &["config", "reconnect"]),
    nested("config_show", "config-show", &["config", "show"]),
    nested("config_update", "config-update", &["config", "update"]),
    nested("config_userinfo", "config-userinfo", &["config", "userinfo"]),
    op("copy", &["copy"]),
    op("copyto", &["copyto"]),
    op("copyurl", &["copyurl"]),
    op("cryptcheck", &["cryptcheck"]),
    op("cryptdecode", &["cryptdecode"]),
    op("dbhashsum", &["dbhashsum"]),
    op("dedupe", &["dedupe"]),
    op("delete", &["delete"]),
    op("deletefile", &["deletefile"]),
    op("genautocomplete", &["genautocomplete"]),
    nested("genautocomplete_bash", "genautocomplete-bash", &["genautocomplete", "bash"]),
    nested("genautocomplete_zsh", "genautocomplete-zsh", &["genautocomplete", "zsh"]),
    op("gendocs", &["gendocs"]),
    op("hashsum", &["hashsum"]),
    op("help", &["help"]),
    op("link", &["link"]),
    op("listremotes", &["listremotes"]),
    op("ls", &["ls"]),
    op("lsd", &["lsd"]),
    op("lsf", &["lsf"]),
    op("lsjson", &["lsjson"]),
    op("lsl", &["lsl"]),
    op("md5sum", &["md5sum"]),
    op("mkdir", &["mkdir"]),
    op("mount", &["mount"]),
    op("move", &["move"]),
    op("moveto", &["moveto"]),
    op("ncdu", &["ncdu"]),
    op("obscure", &["obscure"]),
    op("purge", &["purge"]),
    op("rc", &["rc"]),
    op("rcat", &["rcat"]),
    op("rcd", &["rcd"]),
    op("rmdir", &["rmdir"]),
    op("rmdirs", &["rmdirs"]),
    op("serve", &["serve"]),
    nested("serve_dlna", "serve-dlna", &["serve", "dlna"]),
    nested("serve_ftp", "serve-ftp", &["serve", "ftp"]),
    nested("serve_http", "serve-http", &["serve", "http"]),
    nested("serve_restic", "serve-restic", &["serve", "restic"]),
    nested("serve_sftp", "serve-sftp", &["serve", "sftp"]),
    nested("serve_webdav", "serve-webdav", &["serve", "webdav"]),
    op("settier", &["settier"]),
    op("sha1sum", &["sha1sum"]),
    op("size", &["size"]),
    op("sync", &["sync"]),
    op("touch", &["touch"]),
    op("tree", &["tree"]),
    op("version", &["version"]),
];

impl Operation {
    /// All supported operations.
    pub fn all() -> &'static [Operation] {
        OPERATIONS
    }

    /// Look up an operation by name or alias.
    pub fn from_name(name: &str) -> Option<Self> {
        OPERATIONS
            .iter()
            .find(|op| op.name == name || op.alias == Some(name))
            .copied()
    }

    /// The name shown on the CLI.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The rclone subcommand words this operation forwards to.
    pub fn words(&self) -> &'static [&'static str] {
        self.words
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Unknown operation name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown operation '{0}'")]
pub struct UnknownOperation(pub String);

impl FromStr for Operation {
    type Err = UnknownOperation;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| UnknownOperation(s.to_string()))
    }
}

impl ValueEnum for Operation {
    fn value_variants<'a>() -> &'a [Self] {
        OPERATIONS
    }

    fn to_possible_value(&self) -> Option<PossibleValue> {
        let value = PossibleValue::new(self.name);
        Some(match self.alias {
            Some(alias) => value.alias(alias),
            None => value,
        })
    }
}
