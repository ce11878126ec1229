//! Configuration Module
//!
//! Handles loading the cache and admin server configuration from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Seven days.
pub const DEFAULT_TTL_SECONDS: u64 = 7 * 24 * 60 * 60;

/// Budget for every connect, read and write against the backing store.
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 5;

// == Backend Kind ==
/// Which backing store the binary talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    Redis,
    Memory,
}

impl FromStr for BackendKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "redis" => Ok(BackendKind::Redis),
            "memory" => Ok(BackendKind::Memory),
            other => Err(format!("unknown cache backend: {}", other)),
        }
    }
}

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Redis connection URL
    pub redis_url: String,
    /// When false the cache starts degraded without probing the store
    pub cache_enabled: bool,
    /// Backing store selection
    pub backend: BackendKind,
    /// Entry TTL in seconds
    pub ttl_seconds: u64,
    /// Per-call timeout in seconds for backing store calls
    pub timeout_seconds: u64,
    /// Expiry sweep interval in seconds (memory backend)
    pub sweep_interval: u64,
    /// HTTP server port for the admin API
    pub server_port: u16,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `REDIS_URL` - Full connection URL; overrides the three below when set
    /// - `REDIS_HOST` - Redis host (default: localhost)
    /// - `REDIS_PORT` - Redis port (default: 6379)
    /// - `REDIS_DB` - Logical database index (default: 0)
    /// - `CACHE_ENABLED` - Set to `false` to run degraded (default: true)
    /// - `CACHE_BACKEND` - `redis` or `memory` (default: redis)
    /// - `CACHE_TTL_SECONDS` - Entry TTL (default: 604800)
    /// - `CACHE_TIMEOUT_SECONDS` - Backing store call timeout (default: 5)
    /// - `SWEEP_INTERVAL` - Memory backend sweep frequency in seconds (default: 60)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let redis_url = env::var("REDIS_URL").unwrap_or_else(|_| {
            let host = env::var("REDIS_HOST").unwrap_or_else(|_| "localhost".to_string());
            let port: u16 = env_or("REDIS_PORT", 6379);
            let db: u32 = env_or("REDIS_DB", 0);
            format!("redis://{}:{}/{}", host, port, db)
        });

        Self {
            redis_url,
            cache_enabled: env_or("CACHE_ENABLED", defaults.cache_enabled),
            backend: env_or("CACHE_BACKEND", defaults.backend),
            ttl_seconds: env_or("CACHE_TTL_SECONDS", defaults.ttl_seconds),
            timeout_seconds: env_or("CACHE_TIMEOUT_SECONDS", defaults.timeout_seconds),
            sweep_interval: env_or("SWEEP_INTERVAL", defaults.sweep_interval),
            server_port: env_or("SERVER_PORT", defaults.server_port),
        }
    }

    /// Cache behaviour derived from this configuration.
    pub fn cache_settings(&self) -> CacheSettings {
        CacheSettings {
            ttl: Duration::from_secs(self.ttl_seconds),
            timeout: Duration::from_secs(self.timeout_seconds),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            redis_url: "redis://localhost:6379/0".to_string(),
            cache_enabled: true,
            backend: BackendKind::Redis,
            ttl_seconds: DEFAULT_TTL_SECONDS,
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            sweep_interval: 60,
            server_port: 3000,
        }
    }
}

/// Reads and parses `name`, falling back to `default` when unset or unparseable.
fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

// == Cache Settings ==
/// Per-cache knobs fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheSettings {
    /// TTL applied to every write
    pub ttl: Duration,
    /// Upper bound on each backing store call
    pub timeout: Duration,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(DEFAULT_TTL_SECONDS),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECONDS),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.redis_url, "redis://localhost:6379/0");
        assert!(config.cache_enabled);
        assert_eq!(config.backend, BackendKind::Redis);
        assert_eq!(config.ttl_seconds, 604_800);
        assert_eq!(config.timeout_seconds, 5);
        assert_eq!(config.server_port, 3000);
    }

    #[test]
    fn test_config_from_env_defaults() {
        // Clear any existing env vars to test defaults
        for name in [
            "REDIS_URL",
            "REDIS_HOST",
            "REDIS_PORT",
            "REDIS_DB",
            "CACHE_ENABLED",
            "CACHE_BACKEND",
            "CACHE_TTL_SECONDS",
            "CACHE_TIMEOUT_SECONDS",
            "SWEEP_INTERVAL",
            "SERVER_PORT",
        ] {
            env::remove_var(name);
        }

        let config = Config::from_env();
        assert_eq!(config.redis_url, "redis://localhost:6379/0");
        assert!(config.cache_enabled);
        assert_eq!(config.backend, BackendKind::Redis);
        assert_eq!(config.ttl_seconds, DEFAULT_TTL_SECONDS);
        assert_eq!(config.sweep_interval, 60);
    }

    #[test]
    fn test_backend_kind_parsing() {
        assert_eq!("Memory".parse::<BackendKind>(), Ok(BackendKind::Memory));
        assert_eq!("redis".parse::<BackendKind>(), Ok(BackendKind::Redis));
        assert!("memcached".parse::<BackendKind>().is_err());
    }

    #[test]
    fn test_cache_settings_default_is_seven_days() {
        let settings = CacheSettings::default();
        assert_eq!(settings.ttl, Duration::from_secs(604_800));
        assert_eq!(settings.timeout, Duration::from_secs(5));
        assert_eq!(Config::default().cache_settings(), settings);
    }
}
