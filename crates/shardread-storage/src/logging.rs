//! Structured logging setup.
//!
//! The library emits `tracing` events; binaries and tests that want to see
//! them install a subscriber here. The `SHARDREAD_LOG` environment variable
//! takes precedence over any configured level.
//!
//! # Environment Variables
//!
//! - `SHARDREAD_LOG=info` - Default log level (info)
//! - `SHARDREAD_LOG=debug` - Log every listing, shard and backoff
//! - `SHARDREAD_LOG=shardread_storage::retry=debug` - Retry loop only
//!
//! # Example
//!
//! ```ignore
//! use shardread_storage::logging;
//!
//! logging::init();
//! // or
//! logging::init_with_default("debug");
//! ```

use crate::config::LoggingConfig;
use tracing_subscriber::{fmt, EnvFilter};

const LOG_ENV: &str = "SHARDREAD_LOG";

/// Initializes the global tracing subscriber at `info`.
///
/// Subsequent calls are ignored (tracing only allows one subscriber).
pub fn init() {
    init_with_default("info");
}

/// Initializes the global tracing subscriber with a custom default level.
pub fn init_with_default(default_level: &str) {
    let subscriber = fmt()
        .with_env_filter(filter(default_level))
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact();

    let _ = subscriber.try_init();
}

/// Initializes logging with JSON output format.
pub fn init_json() {
    let subscriber = fmt()
        .with_env_filter(filter("info"))
        .with_target(true)
        .json();

    let _ = subscriber.try_init();
}

/// Initializes logging from the `[logging]` configuration section.
pub fn init_from_config(config: &LoggingConfig) {
    if config.json {
        let subscriber = fmt()
            .with_env_filter(filter(&config.level))
            .with_target(true)
            .json();
        let _ = subscriber.try_init();
    } else {
        init_with_default(&config.level);
    }
}

fn filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_level))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_does_not_panic() {
        init();
        init();
        init_with_default("warn");
        init_json();
        init_from_config(&LoggingConfig::default());
        init_from_config(&LoggingConfig {
            level: "debug".to_string(),
            json: true,
        });
    }
}
