//! Storage infrastructure: configuration file persistence.
//!
//! The `config` sub-module handles:
//!
//! - Reading the TOML configuration file from the platform-appropriate directory.
//! - Writing preferences back to disk when the user changes them.
//! - Providing sensible defaults when the file does not exist yet (first run).

pub mod config;
