//! Error types for the cache
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the cache.
///
/// A missing key is not an error: lookups return `Option`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// Rejected construction parameters (capacity or default TTL)
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Rejected per-call argument (TTL passed to `put`)
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

// == Result Type Alias ==
/// Convenience Result type for the cache.
pub type Result<T> = std::result::Result<T, CacheError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CacheError::InvalidConfiguration("capacity must be positive".to_string());
        assert_eq!(
            err.to_string(),
            "Invalid configuration: capacity must be positive"
        );

        let err = CacheError::InvalidArgument("ttl must be positive".to_string());
        assert_eq!(err.to_string(), "Invalid argument: ttl must be positive");
    }
}
