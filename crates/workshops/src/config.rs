use std::{env, time::Duration};

use crate::storage::CacheSettings;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Cache TTL in seconds (default: 300)
    pub cache_ttl_seconds: u64,
    /// Maximum number of cache entries, 0 for unbounded (default: 10,000)
    pub cache_max_entries: usize,
    /// Whether reads go through the cache at all (default: true)
    pub cache_enabled: bool,
    /// Upper bound on a single store fetch in milliseconds (default: 5,000)
    pub cache_fetch_timeout_ms: u64,
    /// Path to SQLite database file (default: "workshops.db")
    /// Note: Only used when the `sqlite` feature is enabled.
    #[allow(dead_code)]
    pub sqlite_path: String,
}

fn parse_env<T: std::str::FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `CACHE_TTL_SECONDS` - Cache TTL in seconds (default: 300)
    /// - `CACHE_MAX_ENTRIES` - Maximum cache entries, 0 = unbounded (default: 10,000)
    /// - `CACHE_ENABLED` - `true`/`false` (default: true)
    /// - `CACHE_FETCH_TIMEOUT_MS` - Store fetch timeout (default: 5,000)
    /// - `SQLITE_PATH` - SQLite database path (default: "workshops.db")
    pub fn from_env() -> Self {
        Self {
            cache_ttl_seconds: parse_env("CACHE_TTL_SECONDS", 300),
            cache_max_entries: parse_env("CACHE_MAX_ENTRIES", 10_000),
            cache_enabled: parse_env("CACHE_ENABLED", true),
            cache_fetch_timeout_ms: parse_env("CACHE_FETCH_TIMEOUT_MS", 5_000),
            sqlite_path: env::var("SQLITE_PATH").unwrap_or_else(|_| "workshops.db".to_string()),
        }
    }

    /// Get cache TTL as a Duration.
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_seconds)
    }

    /// Settings for the cached repository decorator.
    pub fn cache_settings(&self) -> CacheSettings {
        CacheSettings {
            ttl: self.cache_ttl(),
            fetch_timeout: Duration::from_millis(self.cache_fetch_timeout_ms),
            enabled: self.cache_enabled,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
