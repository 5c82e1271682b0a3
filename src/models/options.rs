//! Option DTOs for cache construction and `set` calls

use std::time::Duration;

use serde::Deserialize;

use crate::config::CacheConfig;
use crate::error::{CacheError, Result};

/// Options accepted when constructing a cache.
///
/// # Fields
/// - `limit`: capacity bound, absent = unbounded
/// - `eviction_interval_ms`: epoch width and sweep cadence in milliseconds,
///   absent = the configured default
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CacheOptions {
    #[serde(default)]
    pub limit: Option<usize>,
    #[serde(default)]
    pub eviction_interval_ms: Option<u64>,
}

impl CacheOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_eviction_interval(mut self, interval: Duration) -> Self {
        self.eviction_interval_ms = Some(u64::try_from(interval.as_millis()).unwrap_or(u64::MAX));
        self
    }

    /// Parses options from a JSON object such as `{"limit": 3}`.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| CacheError::Validation(format!("Invalid cache options: {}", e)))
    }

    /// Resolves the eviction interval against the host defaults.
    ///
    /// Epochs need a positive width, so zero is rejected.
    pub fn eviction_interval(&self, config: &CacheConfig) -> Result<Duration> {
        let interval = self
            .eviction_interval_ms
            .map(Duration::from_millis)
            .unwrap_or(config.default_eviction_interval);
        if interval.is_zero() {
            return Err(CacheError::Validation(
                "Eviction interval must be greater than zero".to_string(),
            ));
        }
        Ok(interval)
    }
}

/// Per-call options for `set`.
///
/// Deserializes from either a bare number of milliseconds or an object with
/// an `expire_in` field. The value is signed so that a negative request can
/// be reported instead of silently clamped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "RawSetOptions")]
pub struct SetOptions {
    /// Milliseconds until expiration
    pub expire_in: Option<i64>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawSetOptions {
    Millis(i64),
    Object {
        #[serde(default)]
        expire_in: Option<i64>,
    },
}

impl From<RawSetOptions> for SetOptions {
    fn from(raw: RawSetOptions) -> Self {
        match raw {
            RawSetOptions::Millis(ms) => Self::expire_in_ms(ms),
            RawSetOptions::Object { expire_in } => Self { expire_in },
        }
    }
}

impl SetOptions {
    pub fn expire_in_ms(ms: i64) -> Self {
        Self {
            expire_in: Some(ms),
        }
    }

    /// Works out the TTL this call should use.
    ///
    /// Negative values are a validation error. Zero or absent falls back to
    /// `default`, which may itself be `None` (never expires).
    pub fn resolve(&self, default: Option<Duration>) -> Result<Option<Duration>> {
        match self.expire_in {
            Some(ms) if ms < 0 => Err(CacheError::Validation(format!(
                "expire_in cannot be negative (got {} ms)",
                ms
            ))),
            Some(ms) if ms > 0 => Ok(Some(Duration::from_millis(ms.unsigned_abs()))),
            _ => Ok(default),
        }
    }
}

impl From<Duration> for SetOptions {
    fn from(expire_in: Duration) -> Self {
        Self::expire_in_ms(millis(expire_in))
    }
}

impl From<i64> for SetOptions {
    fn from(ms: i64) -> Self {
        Self::expire_in_ms(ms)
    }
}

fn millis(duration: Duration) -> i64 {
    i64::try_from(duration.as_millis()).unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_options_deserialize() {
        let options = CacheOptions::from_json(r#"{"limit": 3}"#).unwrap();
        assert_eq!(options.limit, Some(3));
        assert!(options.eviction_interval_ms.is_none());

        let options = CacheOptions::from_json(r#"{"eviction_interval_ms": 10}"#).unwrap();
        assert_eq!(options.eviction_interval_ms, Some(10));
        assert!(options.limit.is_none());
    }

    #[test]
    fn test_cache_options_invalid_json() {
        let result = CacheOptions::from_json(r#"{"limit": -1}"#);
        assert!(matches!(result, Err(CacheError::Validation(_))));
    }

    #[test]
    fn test_eviction_interval_defaults() {
        let config = CacheConfig::default();

        let interval = CacheOptions::new().eviction_interval(&config).unwrap();
        assert_eq!(interval, config.default_eviction_interval);

        let interval = CacheOptions::new()
            .with_eviction_interval(Duration::from_millis(250))
            .eviction_interval(&config)
            .unwrap();
        assert_eq!(interval, Duration::from_millis(250));
    }

    #[test]
    fn test_eviction_interval_zero_rejected() {
        let result = CacheOptions::new()
            .with_eviction_interval(Duration::ZERO)
            .eviction_interval(&CacheConfig::default());
        assert!(matches!(result, Err(CacheError::Validation(_))));
    }

    #[test]
    fn test_set_options_bare_number() {
        let options: SetOptions = serde_json::from_str("100").unwrap();
        assert_eq!(options, SetOptions::expire_in_ms(100));
    }

    #[test]
    fn test_set_options_object() {
        let options: SetOptions = serde_json::from_str(r#"{"expire_in": 100}"#).unwrap();
        assert_eq!(options.expire_in, Some(100));

        let options: SetOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(options, SetOptions::default());
    }

    #[test]
    fn test_resolve() {
        let default = Some(Duration::from_secs(5));

        assert_eq!(
            SetOptions::expire_in_ms(100).resolve(default).unwrap(),
            Some(Duration::from_millis(100))
        );
        assert_eq!(SetOptions::default().resolve(default).unwrap(), default);
        assert_eq!(SetOptions::expire_in_ms(0).resolve(default).unwrap(), default);
        assert_eq!(SetOptions::default().resolve(None).unwrap(), None);
    }

    #[test]
    fn test_resolve_negative() {
        let result = SetOptions::from(-1_i64).resolve(None);
        assert!(matches!(result, Err(CacheError::Validation(_))));
    }

    #[test]
    fn test_from_duration() {
        let options = SetOptions::from(Duration::from_secs(2));
        assert_eq!(options.expire_in, Some(2_000));
    }
}
