//! Configuration system for tweetshape.
//!
//! Provides layered configuration from multiple sources:
//!
//! 1. **Compiled defaults** - Sensible defaults built into the binary
//! 2. **User config file** - `~/.config/tweetshape/config.toml`
//! 3. **Environment variables** - `TWEETSHAPE_*` prefix
//! 4. **CLI arguments** - Highest priority, always wins
//!
//! # Example Configuration File
//!
//! ```toml
//! [validation]
//! username_policy = "strip"
//! naive_timestamps = "assume_utc"
//! require_https_images = false
//!
//! [output]
//! format = "text"
//! colors = true
//! ```

use crate::cli::OutputFormat;
use crate::date_parser::NaiveTimestampPolicy;
use crate::error::TweetshapeError;
use crate::parser::{UsernamePolicy, ValidationOptions};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Main configuration structure for tweetshape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Validation policies.
    pub validation: ValidationOptions,
    /// Output formatting configuration.
    pub output: OutputConfig,
}

/// Output formatting configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Default output format: text, json, json-pretty, jsonl.
    /// Environment variable: `TWEETSHAPE_FORMAT`
    pub format: OutputFormat,

    /// Enable colored output.
    pub colors: bool,

    /// Only print failures.
    pub quiet: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Text,
            colors: true,
            quiet: false,
        }
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// `explicit` replaces the user config file location when given.
    pub fn load(explicit: Option<&Path>) -> Self {
        let mut config = Self::default();

        let file = explicit
            .map(Path::to_path_buf)
            .or_else(Self::user_config_path);
        if let Some(path) = file {
            match Self::load_from_file(&path) {
                Ok(Some(file_config)) => config.merge(file_config),
                Ok(None) => {}
                Err(e) => warn!("{e}; using defaults"),
            }
        }

        config.apply_env_overrides();

        debug!("Configuration loaded: {:?}", config);
        config
    }

    /// Load configuration from a specific file.
    ///
    /// Returns `Ok(None)` when the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_from_file(path: &Path) -> crate::Result<Option<Self>> {
        if !path.exists() {
            debug!("Config file not found: {}", path.display());
            return Ok(None);
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| TweetshapeError::path_error("read", path, e))?;
        let config = toml::from_str(&content).map_err(|e| TweetshapeError::ConfigError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        info!("Loaded config from: {}", path.display());
        Ok(Some(config))
    }

    /// Get the path to the user configuration file.
    #[must_use]
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("tweetshape").join("config.toml"))
    }

    /// Apply environment variable overrides.
    fn apply_env_overrides(&mut self) {
        self.apply_env_with(|name| std::env::var(name).ok());
    }

    /// Apply overrides from an environment lookup function.
    fn apply_env_with(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        // Validation overrides
        if let Some(policy) = lookup("TWEETSHAPE_USERNAME_POLICY") {
            match parse_choice::<UsernamePolicy>(&policy) {
                Some(p) => self.validation.username_policy = p,
                None => warn!("Ignoring invalid TWEETSHAPE_USERNAME_POLICY: {policy}"),
            }
        }
        if let Some(policy) = lookup("TWEETSHAPE_NAIVE_TIMESTAMPS") {
            match parse_choice::<NaiveTimestampPolicy>(&policy) {
                Some(p) => self.validation.naive_timestamps = p,
                None => warn!("Ignoring invalid TWEETSHAPE_NAIVE_TIMESTAMPS: {policy}"),
            }
        }
        if let Some(flag) = lookup("TWEETSHAPE_REQUIRE_HTTPS") {
            self.validation.require_https_images = is_truthy(&flag);
        }

        // Output overrides
        if let Some(format) = lookup("TWEETSHAPE_FORMAT") {
            match parse_choice::<OutputFormat>(&format) {
                Some(f) => self.output.format = f,
                None => warn!("Ignoring invalid TWEETSHAPE_FORMAT: {format}"),
            }
        }
        if lookup("TWEETSHAPE_NO_COLOR").is_some() || lookup("NO_COLOR").is_some() {
            self.output.colors = false;
        }
        if lookup("TWEETSHAPE_QUIET").is_some() {
            self.output.quiet = true;
        }
    }

    /// Merge another config into this one (other takes precedence).
    fn merge(&mut self, other: Self) {
        self.validation = other.validation;
        self.output = other.output;
    }

    /// Render the configuration as TOML.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

/// Parse a clap value name, accepting `snake_case` spellings too.
fn parse_choice<T: ValueEnum>(raw: &str) -> Option<T> {
    T::from_str(&raw.trim().replace('_', "-"), true).ok()
}

fn is_truthy(raw: &str) -> bool {
    matches!(
        raw.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
