//! ui
//!
//! User-facing output.
//!
//! # Modules
//!
//! - [`output`] - Logging setup and result reporting
//!
//! # Design
//!
//! Diagnostics go through `tracing` to stderr. Standard output is reserved
//! for machine-readable results (`--json`) and completion scripts.

pub mod output;
