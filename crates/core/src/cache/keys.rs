use std::fmt;

use uuid::Uuid;

/// Prefix shared by every cached search result.
pub const SEARCH_KEY_PREFIX: &str = "workshops:search:";

/// A canonical cache key.
///
/// Search keys are only produced by [`crate::search::normalize`]; the other
/// key builders in this module cover single-record lookups.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CacheKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Returns the cache key for a single workshop.
pub fn workshop_key(workshop_id: Uuid) -> CacheKey {
    CacheKey(format!("workshop:{}", workshop_id))
}

/// Returns the pattern matching every cached search result.
pub fn search_pattern() -> String {
    format!("{SEARCH_KEY_PREFIX}*")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::pattern_matches;
    use crate::search::{normalize, SearchQuery};

    #[test]
    fn test_workshop_key() {
        let key = workshop_key(Uuid::nil());
        assert_eq!(key.as_str(), "workshop:00000000-0000-0000-0000-000000000000");
    }

    #[test]
    fn test_search_pattern() {
        assert_eq!(search_pattern(), "workshops:search:*");
    }

    #[test]
    fn test_search_pattern_covers_search_keys_only() {
        let pattern = search_pattern();

        assert!(pattern_matches(&pattern, normalize(&SearchQuery::all()).as_str()));
        assert!(pattern_matches(
            &pattern,
            normalize(&SearchQuery::new("react")).as_str()
        ));
        assert!(!pattern_matches(&pattern, workshop_key(Uuid::nil()).as_str()));
    }

    #[test]
    fn test_display_matches_as_str() {
        let key = CacheKey::new("workshop:1");
        assert_eq!(key.to_string(), key.as_str());
        assert_eq!(key.into_string(), "workshop:1");
    }
}
