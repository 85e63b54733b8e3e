use std::time::Duration;

use async_trait::async_trait;

use super::Result;

/// A time-bounded key/value store.
///
/// Implementations must be safe to share across concurrent requests. Each
/// operation is atomic with respect to a single key: a `get` never observes a
/// partially written `set`.
#[async_trait]
pub trait Cache: Send + Sync {
    /// Gets a value by key. Expired entries are reported as absent.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Stores a value, replacing any previous one, with an optional TTL.
    async fn set(&self, key: &str, value: &[u8], ttl: Option<Duration>) -> Result<()>;

    /// Removes a key. Removing an absent key is a no-op.
    async fn delete(&self, key: &str) -> Result<()>;

    /// Removes every key matching a glob pattern (e.g. `"workshops:search:*"`).
    async fn delete_pattern(&self, pattern: &str) -> Result<()>;
}
