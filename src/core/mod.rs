//! core
//!
//! Core domain types and operations for rclone-guard.
//!
//! # Modules
//!
//! - [`ops`] - Process locking and the polling driver
//! - [`config`] - Configuration schema and loading
//! - [`paths`] - Default locations for the lock and config files
//!
//! # Design Principles
//!
//! - The lock guard knows nothing about rclone
//! - Invalid settings are rejected when loaded, not when used

pub mod config;
pub mod ops;
pub mod paths;
