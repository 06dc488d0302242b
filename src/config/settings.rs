//! TOML-based configuration for mqlens.
//!
//! Supports a config file (mqlens.toml) with environment variable expansion.
//!
//! Example configuration:
//! ```toml
//! [compile]
//! navigator = false
//! strict_and_join = false   # keep legacy concatenation on polling queries
//! default_since_minutes = 30
//!
//! [graph]
//! account_id = "${NEW_RELIC_ACCOUNT_ID}"
//! ```

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::compile::CompileOptions;
use crate::model::TimeRange;

/// Error type for settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid account id: {0}")]
    InvalidAccountId(String),
}

/// Root settings structure.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    /// Query compilation defaults.
    pub compile: CompileSettings,

    /// NerdGraph request defaults.
    pub graph: GraphSettings,
}

/// Compilation defaults applied when a request doesn't say otherwise.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CompileSettings {
    /// Render correlated subqueries in the navigator shape.
    pub navigator: bool,

    /// Join WHERE clauses with `AND` on every dialect.
    pub strict_and_join: bool,

    /// Window used when a request carries no time range.
    pub default_since_minutes: u64,
}

impl Default for CompileSettings {
    fn default() -> Self {
        Self {
            navigator: false,
            strict_and_join: false,
            default_since_minutes: 30,
        }
    }
}

/// Graph settings.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct GraphSettings {
    /// Account for NRQL lookups. May reference environment variables.
    pub account_id: Option<String>,
}

impl Settings {
    /// Load settings from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SettingsError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        let settings: Settings = toml::from_str(&content)?;
        tracing::debug!(path = %path.display(), "loaded settings");
        Ok(settings)
    }

    /// Load settings from the default config file locations.
    ///
    /// Searches in order:
    /// 1. Environment variable `MQLENS_CONFIG`
    /// 2. `./mqlens.toml`
    /// 3. `~/.config/mqlens/config.toml`
    pub fn load() -> Result<Self, SettingsError> {
        if let Ok(path) = env::var("MQLENS_CONFIG") {
            return Self::from_file(&path);
        }

        let local_config = PathBuf::from("mqlens.toml");
        if local_config.exists() {
            return Self::from_file(&local_config);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("mqlens").join("config.toml");
            if user_config.exists() {
                return Self::from_file(&user_config);
            }
        }

        Ok(Settings::default())
    }

    /// Compile options from the `[compile]` table.
    pub fn compile_options(&self) -> CompileOptions {
        CompileOptions::default()
            .with_navigator(self.compile.navigator)
            .with_strict_and_join(self.compile.strict_and_join)
    }

    /// Time range for requests that carry none.
    pub fn default_time_range(&self) -> TimeRange {
        TimeRange::last_minutes(self.compile.default_since_minutes)
    }

    /// The configured account id, with environment variables expanded.
    pub fn account_id(&self) -> Result<Option<u64>, SettingsError> {
        let Some(raw) = &self.graph.account_id else {
            return Ok(None);
        };
        let expanded = expand_env_vars(raw)?;
        expanded
            .trim()
            .parse::<u64>()
            .map(Some)
            .map_err(|_| SettingsError::InvalidAccountId(expanded))
    }
}

/// Expand environment variables in a string.
///
/// Supports `${VAR}` and `$VAR` syntax.
pub fn expand_env_vars(s: &str) -> Result<String, SettingsError> {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '$' {
            result.push(c);
            continue;
        }

        let var_name: String = if chars.next_if_eq(&'{').is_some() {
            chars.by_ref().take_while(|&ch| ch != '}').collect()
        } else {
            let mut name = String::new();
            while let Some(ch) = chars.next_if(|ch| ch.is_alphanumeric() || *ch == '_') {
                name.push(ch);
            }
            if name.is_empty() {
                // Just a lone $, keep it
                result.push('$');
                continue;
            }
            name
        };

        let value = env::var(&var_name).map_err(|_| SettingsError::MissingEnvVar(var_name))?;
        result.push_str(&value);
    }

    Ok(result)
}
