//! Configuration Module
//!
//! Loads service configuration from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Service configuration parameters.
///
/// Every value can be set through an environment variable; unset or
/// unparsable values fall back to the defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Maximum number of results the cache can hold
    pub max_entries: usize,
    /// Lifetime in seconds of every cached result
    pub cache_ttl: u64,
    /// HTTP server port
    pub server_port: u16,
    /// Background expiry sweep interval in seconds
    pub cleanup_interval: u64,
    /// Number of request records kept in the history log
    pub history_capacity: usize,
    /// Number of entries shown by the cache info endpoint
    pub sample_size: usize,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `MAX_ENTRIES` - Maximum cache entries (default: 1000)
    /// - `CACHE_TTL` - Result lifetime in seconds (default: 300)
    /// - `SERVER_PORT` - HTTP server port (default: 8000)
    /// - `CLEANUP_INTERVAL` - Expiry sweep frequency in seconds (default: 30)
    /// - `HISTORY_CAPACITY` - Request records kept (default: 10000)
    /// - `CACHE_SAMPLE_SIZE` - Entries in the cache info sample (default: 10)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_entries: env_or("MAX_ENTRIES", defaults.max_entries),
            cache_ttl: env_or("CACHE_TTL", defaults.cache_ttl),
            server_port: env_or("SERVER_PORT", defaults.server_port),
            cleanup_interval: env_or("CLEANUP_INTERVAL", defaults.cleanup_interval),
            history_capacity: env_or("HISTORY_CAPACITY", defaults.history_capacity),
            sample_size: env_or("CACHE_SAMPLE_SIZE", defaults.sample_size),
        }
    }

    pub fn cleanup_period(&self) -> Duration {
        Duration::from_secs(self.cleanup_interval.max(1))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_entries: 1000,
            cache_ttl: 300,
            server_port: 8000,
            cleanup_interval: 30,
            history_capacity: 10_000,
            sample_size: 10,
        }
    }
}

fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}
