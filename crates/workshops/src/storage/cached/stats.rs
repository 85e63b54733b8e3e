//! Lock-free counters behind the cache statistics report.

use std::sync::atomic::{AtomicU64, Ordering};

use workshops_core::cache::{CacheCounters, CacheStatsReport};
use workshops_core::context::RequestContext;

use super::workshop::CacheSettings;

/// Process-wide read-through counters.
///
/// Holds no request-scoped data; callers pass their context when they ask
/// for a report.
#[derive(Debug, Default)]
pub struct CacheStats {
    hits: AtomicU64,
    misses: AtomicU64,
    collapsed: AtomicU64,
    fills: AtomicU64,
    discarded_fills: AtomicU64,
    invalidations: AtomicU64,
    fetch_failures: AtomicU64,
    cache_errors: AtomicU64,
    bypassed: AtomicU64,
}

macro_rules! recorder {
    ($($name:ident => $field:ident),* $(,)?) => {
        $(
            pub fn $name(&self) {
                self.$field.fetch_add(1, Ordering::Relaxed);
            }
        )*
    };
}

impl CacheStats {
    pub fn new() -> Self {
        Self::default()
    }

    recorder! {
        record_hit => hits,
        record_miss => misses,
        record_collapsed => collapsed,
        record_fill => fills,
        record_discarded_fill => discarded_fills,
        record_invalidation => invalidations,
        record_fetch_failure => fetch_failures,
        record_cache_error => cache_errors,
        record_bypass => bypassed,
    }

    /// Reads every counter. Counters are independent, so the snapshot is not
    /// atomic across fields.
    pub fn snapshot(&self) -> CacheCounters {
        CacheCounters {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            collapsed: self.collapsed.load(Ordering::Relaxed),
            fills: self.fills.load(Ordering::Relaxed),
            discarded_fills: self.discarded_fills.load(Ordering::Relaxed),
            invalidations: self.invalidations.load(Ordering::Relaxed),
            fetch_failures: self.fetch_failures.load(Ordering::Relaxed),
            cache_errors: self.cache_errors.load(Ordering::Relaxed),
            bypassed: self.bypassed.load(Ordering::Relaxed),
        }
    }

    /// Builds a report for the caller in `ctx`.
    pub fn report(&self, ctx: &RequestContext, settings: &CacheSettings) -> CacheStatsReport {
        CacheStatsReport::new(
            ctx,
            settings.enabled,
            settings.ttl.as_secs(),
            self.snapshot(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_reflects_records() {
        let stats = CacheStats::new();
        stats.record_hit();
        stats.record_hit();
        stats.record_miss();
        stats.record_collapsed();
        stats.record_bypass();

        let counters = stats.snapshot();
        assert_eq!(counters.hits, 2);
        assert_eq!(counters.misses, 1);
        assert_eq!(counters.collapsed, 1);
        assert_eq!(counters.bypassed, 1);
        assert_eq!(counters.fills, 0);
    }
}
