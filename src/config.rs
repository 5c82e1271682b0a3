//! Configuration Module
//!
//! Host-level defaults shared by every cache created in the process, loaded
//! from environment variables.

use std::env;
use std::time::Duration;

/// Default epoch width and sweep cadence (one minute).
pub const DEFAULT_EVICTION_INTERVAL_MS: u64 = 60 * 1000;

/// Host-level cache defaults.
///
/// Individual caches override `default_eviction_interval` through
/// `CacheOptions`; `default_expire_in` applies to every `set` that does not
/// name its own TTL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// Eviction interval for caches that do not specify one
    pub default_eviction_interval: Duration,
    /// TTL for entries set without one, None = never expire
    pub default_expire_in: Option<Duration>,
}

impl CacheConfig {
    /// Creates a new CacheConfig by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_EVICTION_INTERVAL_MS` - Sweep interval in ms (default: 60000)
    /// - `CACHE_DEFAULT_EXPIRE_IN_MS` - Default TTL in ms (default: never)
    pub fn from_env() -> Self {
        Self {
            default_eviction_interval: env::var("CACHE_EVICTION_INTERVAL_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|&ms: &u64| ms > 0)
                .map(Duration::from_millis)
                .unwrap_or(Duration::from_millis(DEFAULT_EVICTION_INTERVAL_MS)),
            default_expire_in: env::var("CACHE_DEFAULT_EXPIRE_IN_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|&ms: &u64| ms > 0)
                .map(Duration::from_millis),
        }
    }

    pub fn with_default_expire_in(mut self, expire_in: Duration) -> Self {
        self.default_expire_in = Some(expire_in);
        self
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            default_eviction_interval: Duration::from_millis(DEFAULT_EVICTION_INTERVAL_MS),
            default_expire_in: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = CacheConfig::default();
        assert_eq!(config.default_eviction_interval, Duration::from_secs(60));
        assert!(config.default_expire_in.is_none());
    }

    #[test]
    fn test_config_from_env() {
        // Single test so the two phases cannot race on the process environment
        env::remove_var("CACHE_EVICTION_INTERVAL_MS");
        env::remove_var("CACHE_DEFAULT_EXPIRE_IN_MS");
        assert_eq!(CacheConfig::from_env(), CacheConfig::default());

        env::set_var("CACHE_EVICTION_INTERVAL_MS", "250");
        env::set_var("CACHE_DEFAULT_EXPIRE_IN_MS", "not-a-number");
        let config = CacheConfig::from_env();
        assert_eq!(config.default_eviction_interval, Duration::from_millis(250));
        assert!(config.default_expire_in.is_none());

        env::set_var("CACHE_EVICTION_INTERVAL_MS", "0");
        env::set_var("CACHE_DEFAULT_EXPIRE_IN_MS", "1500");
        let config = CacheConfig::from_env();
        assert_eq!(config.default_eviction_interval, Duration::from_secs(60));
        assert_eq!(config.default_expire_in, Some(Duration::from_millis(1500)));

        env::remove_var("CACHE_EVICTION_INTERVAL_MS");
        env::remove_var("CACHE_DEFAULT_EXPIRE_IN_MS");
    }
}
