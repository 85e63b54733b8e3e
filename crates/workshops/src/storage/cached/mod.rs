//! Cached repository decorator.
//!
//! Wraps a `WorkshopRepository` with a read-through cache:
//!
//! - **Reads**: check the cache; on a miss, exactly one fetch per key runs
//!   against the wrapped repository and its result is stored with a TTL
//! - **Writes**: persist to the wrapped repository, then invalidate every
//!   cache entry the write could have made stale
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//!
//! let repo = Arc::new(SqliteRepository::new("workshops.db").await?);
//! let cache = Arc::new(MemoryCache::new(10_000));
//!
//! let cached_repo = CachedWorkshopRepository::new(repo, cache, CacheSettings::default());
//! ```

mod flight;
mod stats;
mod workshop;

pub use stats::CacheStats;
pub use workshop::{CacheSettings, CachedWorkshopRepository};
