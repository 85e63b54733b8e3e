use thiserror::Error;

/// Errors raised by a cache backend.
///
/// These never reach callers of the cached repository: a failing cache
/// degrades to serving straight from storage.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CacheError {
    #[error("Cache connection failed: {0}")]
    ConnectionFailed(String),
}

/// Result type for cache operations.
pub type Result<T> = std::result::Result<T, CacheError>;
