//! Configuration for sharded reads.
//!
//! Supports:
//! - Default values (embedded in binary)
//! - Configuration files (TOML format)
//! - Environment variable overrides (prefix: `SHARDREAD__`)
//!
//! # Environment Variables
//!
//! - `SHARDREAD__RETRY__INITIAL_INTERVAL_MS=500`
//! - `SHARDREAD__RETRY__MULTIPLIER=2.0`
//! - `SHARDREAD__RETRY__MAX_INTERVAL_MS=60000`
//! - `SHARDREAD__RETRY__MAX_RETRIES=8`
//! - `SHARDREAD__RETRY__MAX_CUMULATIVE_BACKOFF_MS=300000`
//! - `SHARDREAD__LOGGING__LEVEL=debug`
//! - `SHARDREAD__LOGGING__JSON=true`
//!
//! # Example
//!
//! ```ignore
//! use shardread_storage::config::ShardReadConfig;
//! use shardread_storage::ShardedFile;
//!
//! let config = ShardReadConfig::load(Some("shardread.toml"))?;
//! let output = ShardedFile::new("/out/result-*")?.with_backoff(config.retry);
//! ```

use crate::retry::BackOffConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read configuration file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Root configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShardReadConfig {
    /// Backoff policy for the default read entry points
    pub retry: BackOffConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

impl ShardReadConfig {
    /// Loads configuration from an optional file path with environment variable overrides.
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (SHARDREAD__*)
    /// 2. Configuration file (if provided and present)
    /// 3. Built-in defaults
    pub fn load(path: Option<&str>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(file_path) = path {
            if Path::new(file_path).exists() {
                let contents = std::fs::read_to_string(file_path)?;
                config = toml::from_str(&contents)?;
            }
        }

        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Applies overrides looked up by environment-style key.
    ///
    /// Values that fail to parse are ignored.
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(v) = parsed(&lookup, "SHARDREAD__RETRY__INITIAL_INTERVAL_MS") {
            self.retry.initial_interval_ms = v;
        }
        if let Some(v) = parsed(&lookup, "SHARDREAD__RETRY__MULTIPLIER") {
            self.retry.multiplier = v;
        }
        if let Some(v) = parsed(&lookup, "SHARDREAD__RETRY__MAX_INTERVAL_MS") {
            self.retry.max_interval_ms = v;
        }
        if let Some(v) = parsed(&lookup, "SHARDREAD__RETRY__MAX_RETRIES") {
            self.retry.max_retries = v;
        }
        if let Some(v) = parsed(&lookup, "SHARDREAD__RETRY__MAX_CUMULATIVE_BACKOFF_MS") {
            self.retry.max_cumulative_backoff_ms = v;
        }

        if let Some(val) = lookup("SHARDREAD__LOGGING__LEVEL") {
            self.logging.level = val;
        }
        if let Some(val) = lookup("SHARDREAD__LOGGING__JSON") {
            self.logging.json = val.to_lowercase() == "true" || val == "1";
        }
    }

    /// Serializes the configuration to TOML format.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

fn parsed<T: std::str::FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    lookup(key).and_then(|val| val.parse().ok())
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Use JSON format for log output
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = ShardReadConfig::default();
        assert_eq!(config.retry.max_retries, 4);
        assert_eq!(config.retry.initial_interval_ms, 10_000);
        assert_eq!(config.logging.level, "info");
        assert!(!config.logging.json);
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        let config = ShardReadConfig::load(Some(path.to_str().unwrap())).unwrap();
        assert_eq!(config.retry, BackOffConfig::default());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("shardread.toml");
        std::fs::write(&path, "[retry]\nmax_retries = 9\n").unwrap();

        let config = ShardReadConfig::load(Some(path.to_str().unwrap())).unwrap();
        assert_eq!(config.retry.max_retries, 9);
        assert_eq!(config.retry.multiplier, 1.5);
    }

    #[test]
    fn test_load_rejects_bad_toml() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "[retry\n").unwrap();

        let err = ShardReadConfig::load(Some(path.to_str().unwrap())).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    // Overrides go through an injected lookup so tests never touch the
    // process environment.
    #[test]
    fn test_overrides() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("SHARDREAD__RETRY__MAX_RETRIES", "12"),
            ("SHARDREAD__RETRY__MULTIPLIER", "2.5"),
            ("SHARDREAD__RETRY__INITIAL_INTERVAL_MS", "not-a-number"),
            ("SHARDREAD__LOGGING__LEVEL", "debug"),
            ("SHARDREAD__LOGGING__JSON", "1"),
        ]);
        let mut config = ShardReadConfig::default();
        config.apply_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.retry.max_retries, 12);
        assert_eq!(config.retry.multiplier, 2.5);
        assert_eq!(config.retry.initial_interval_ms, 10_000);
        assert_eq!(config.logging.level, "debug");
        assert!(config.logging.json);
    }

    #[test]
    fn test_toml_roundtrip() {
        let config = ShardReadConfig::default();
        let toml_str = config.to_toml().unwrap();

        assert!(toml_str.contains("[retry]"));
        assert!(toml_str.contains("[logging]"));

        let parsed: ShardReadConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_parse_partial_toml() {
        let toml_str = r#"
            [retry]
            initial_interval_ms = 250
            max_cumulative_backoff_ms = 5000

            [logging]
            json = true
        "#;

        let config: ShardReadConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.retry.initial_interval_ms, 250);
        assert_eq!(config.retry.max_cumulative_backoff_ms, 5000);
        assert_eq!(config.retry.max_retries, 4);
        assert!(config.logging.json);
        assert_eq!(config.logging.level, "info");
    }
}
