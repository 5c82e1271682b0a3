//! Error types for the cache
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the cache.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// Caller supplied an invalid argument; no state was changed
    #[error("Validation error: {0}")]
    Validation(String),

    /// Internal usage-order bookkeeping was about to be corrupted
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),
}

// == Result Type Alias ==
/// Convenience Result type for the cache.
pub type Result<T> = std::result::Result<T, CacheError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CacheError::Validation("negative expire_in".to_string());
        assert_eq!(err.to_string(), "Validation error: negative expire_in");

        let err = CacheError::InvariantViolation("already linked".to_string());
        assert_eq!(err.to_string(), "Invariant violation: already linked");
    }
}
