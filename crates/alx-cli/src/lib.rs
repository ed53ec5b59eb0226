//! The `alx` command line
//!
//! Wires the feed loader, the normalizers and the project writer together,
//! and owns the one piece of user state the tool keeps: a small configuration
//! file. The binary in `main.rs` only parses arguments, sets up logging and
//! maps the outcome to an exit status.

#![warn(unreachable_pub)]

pub mod commands;
pub mod config;

pub use commands::{build_cli, run};
pub use config::{ConfigError, ConfigKey, ConfigResult, UserConfig};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
