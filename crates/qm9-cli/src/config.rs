//! Layered configuration for the `convert` command.
//!
//! Values are resolved from built-in defaults, then an optional TOML file,
//! then `-S key=value` overrides, then dedicated CLI flags.

pub mod builder;
pub mod defaults;
pub mod file;
pub mod models;

pub use builder::build_config;
