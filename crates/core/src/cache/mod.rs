mod error;
mod invalidation;
mod keys;
mod patterns;
mod serialization;
mod stats;
mod traits;

pub use error::{CacheError, Result};
pub use invalidation::{invalidation_targets, InvalidationTargets};
pub use keys::{search_pattern, workshop_key, CacheKey, SEARCH_KEY_PREFIX};
pub use patterns::{literal_prefix, pattern_matches};
pub use serialization::{from_cache_bytes, to_cache_bytes, SerializationError};
pub use stats::{CacheCounters, CacheStatsReport};
pub use traits::Cache;
