//! Configuration module for mqlens.
//!
//! Handles the TOML settings file and environment variable expansion.

mod settings;

pub use settings::{expand_env_vars, CompileSettings, GraphSettings, Settings, SettingsError};
