//! Query normalization: turns a [`SearchQuery`] into a canonical [`CacheKey`].
//!
//! Pure and total. Any well-typed query produces a key, including queries the
//! store will later reject: those fail on fetch, and failed fetches are never
//! cached, so their keys never hit.

use chrono::SecondsFormat;

use crate::cache::{CacheKey, SEARCH_KEY_PREFIX};

use super::{SearchFilter, SearchQuery};

/// Lower-cases, trims and collapses runs of whitespace to a single space.
pub fn normalize_text(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Canonical string form of a filter, or `None` if the filter restricts
/// nothing (a blank location).
fn encode_filter(filter: &SearchFilter) -> Option<String> {
    match filter {
        SearchFilter::StartsFrom(t) => Some(format!(
            "from={}",
            t.to_rfc3339_opts(SecondsFormat::AutoSi, true)
        )),
        SearchFilter::StartsBefore(t) => Some(format!(
            "before={}",
            t.to_rfc3339_opts(SecondsFormat::AutoSi, true)
        )),
        SearchFilter::Mode(mode) => Some(format!("mode={}", mode.as_str())),
        SearchFilter::Location(location) => {
            let location = normalize_text(location);
            (!location.is_empty()).then(|| format!("location={location}"))
        }
    }
}

/// Derives the cache key for a search query.
///
/// The term is normalized with [`normalize_text`]; filters are encoded,
/// sorted and de-duplicated so client ordering does not matter. Components
/// are JSON-encoded, which keeps the mapping injective whatever characters the
/// term contains.
///
/// # Examples
///
/// ```
/// use workshops_core::search::{normalize, SearchFilter, Attendance, SearchQuery};
///
/// let a = SearchQuery::new("  React ")
///     .with_filter(SearchFilter::Mode(Attendance::Online))
///     .with_filter(SearchFilter::Location("Lisbon".into()));
/// let b = SearchQuery::new("react")
///     .with_filter(SearchFilter::Location("  lisbon".into()))
///     .with_filter(SearchFilter::Mode(Attendance::Online));
///
/// assert_eq!(normalize(&a), normalize(&b));
/// ```
pub fn normalize(query: &SearchQuery) -> CacheKey {
    let term = normalize_text(&query.term);

    let mut filters: Vec<String> = query.filters.iter().filter_map(encode_filter).collect();
    filters.sort();
    filters.dedup();

    let encoded = serde_json::json!({ "term": term, "filters": filters });
    CacheKey::new(format!("{SEARCH_KEY_PREFIX}{encoded}"))
}
