//! Glob matching for cache keys.
//!
//! Patterns support a single wildcard, `*`, matching any run of characters
//! (including none). Everything else matches literally.

/// Checks if a cache key matches a glob pattern.
///
/// # Examples
///
/// ```
/// use workshops_core::cache::pattern_matches;
///
/// assert!(pattern_matches("workshop:42", "workshop:42"));
/// assert!(pattern_matches("workshops:search:*", "workshops:search:{\"term\":\"react\"}"));
/// assert!(pattern_matches("*:search:*", "workshops:search:x"));
/// assert!(!pattern_matches("workshops:search:*", "workshop:42"));
/// ```
pub fn pattern_matches(pattern: &str, key: &str) -> bool {
    let mut segments = pattern.split('*');

    // `split` always yields at least one segment; the first is anchored.
    let first = segments.next().unwrap_or_default();
    let Some(mut rest) = key.strip_prefix(first) else {
        return false;
    };

    let tail: Vec<&str> = segments.collect();
    let Some((last, middle)) = tail.split_last() else {
        // No wildcard at all: exact match.
        return rest.is_empty();
    };

    for segment in middle {
        match rest.find(segment) {
            Some(pos) => rest = &rest[pos + segment.len()..],
            None => return false,
        }
    }

    // The last segment is anchored at the end of the key.
    rest.ends_with(last)
}

/// Returns the literal portion of a pattern before its first wildcard.
///
/// Every key matching `pattern` starts with this prefix, so backends can use
/// it to narrow a scan.
pub fn literal_prefix(pattern: &str) -> &str {
    match pattern.find('*') {
        Some(pos) => &pattern[..pos],
        None => pattern,
    }
}
