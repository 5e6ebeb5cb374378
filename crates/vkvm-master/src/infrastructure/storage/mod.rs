//! Storage infrastructure: configuration file loading.
//!
//! This module provides a thin adapter between the application and the
//! file system.  The `config` sub-module handles:
//!
//! - Locating the TOML configuration file in the platform-appropriate directory.
//! - Parsing it into typed settings, with defaults for omitted fields.
//! - Turning the `[profiles.*]` tables into validated profiles.
pub mod config;
