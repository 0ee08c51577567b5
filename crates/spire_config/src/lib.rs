//! Parsing and validation of `spire.toml` project configuration files.
//!
//! This crate reads the project configuration file and produces a strongly-typed
//! [`SpireConfig`], which [`resolve_project`] turns into absolute paths and a
//! ready-to-use [`ToolchainConfig`](spire_compiler::ToolchainConfig).

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod resolve;
pub mod types;

pub use error::ConfigError;
pub use loader::{load_config, load_config_from_str, CONFIG_FILE};
pub use resolve::{resolve_project, ResolvedProject};
pub use types::*;
