//! Cache statistics report.
//!
//! The report is built on demand from a snapshot of counters and the
//! requesting caller's context; nothing here holds state between requests.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::context::{RequestContext, RequestId};

/// Point-in-time values of the read-through counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheCounters {
    /// Reads answered from the cache.
    pub hits: u64,
    /// Reads that started a fetch.
    pub misses: u64,
    /// Reads that joined a fetch already in flight.
    pub collapsed: u64,
    /// Fetch results stored in the cache.
    pub fills: u64,
    /// Fetch results dropped because a write invalidated them mid-fetch.
    pub discarded_fills: u64,
    /// Writes that ran invalidation.
    pub invalidations: u64,
    /// Fetches that ended in an error or timeout.
    pub fetch_failures: u64,
    /// Cache backend failures that were bypassed.
    pub cache_errors: u64,
    /// Reads served with caching disabled.
    pub bypassed: u64,
}

impl CacheCounters {
    /// Fraction of cached reads answered without a fetch of their own.
    ///
    /// `None` until the first cached read.
    pub fn hit_ratio(&self) -> Option<f64> {
        let lookups = self.hits + self.misses + self.collapsed;
        (lookups > 0).then(|| self.hits as f64 / lookups as f64)
    }
}

/// Cache statistics as returned to an operator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheStatsReport {
    pub generated_at: DateTime<Utc>,
    pub request_id: RequestId,
    pub enabled: bool,
    pub ttl_seconds: u64,
    #[serde(flatten)]
    pub counters: CacheCounters,
    pub hit_ratio: Option<f64>,
}

impl CacheStatsReport {
    /// Builds a report stamped with the caller's clock and request id.
    pub fn new(
        ctx: &RequestContext,
        enabled: bool,
        ttl_seconds: u64,
        counters: CacheCounters,
    ) -> Self {
        Self {
            generated_at: ctx.now,
            request_id: ctx.request_id,
            enabled,
            ttl_seconds,
            counters,
            hit_ratio: counters.hit_ratio(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_hit_ratio() {
        assert_eq!(CacheCounters::default().hit_ratio(), None);

        let counters = CacheCounters {
            hits: 3,
            misses: 1,
            ..Default::default()
        };
        assert_eq!(counters.hit_ratio(), Some(0.75));
    }

    #[test]
    fn test_report_uses_caller_context() {
        let first = RequestContext::new(Utc.with_ymd_and_hms(2024, 6, 15, 9, 0, 0).unwrap());
        let second = RequestContext::new(Utc.with_ymd_and_hms(2024, 6, 16, 9, 0, 0).unwrap());
        let counters = CacheCounters::default();

        let a = CacheStatsReport::new(&first, true, 300, counters);
        let b = CacheStatsReport::new(&second, true, 300, counters);

        assert_eq!(a.generated_at, first.now);
        assert_eq!(a.request_id, first.request_id);
        assert_eq!(b.generated_at, second.now);
        assert_eq!(b.request_id, second.request_id);
    }

    #[test]
    fn test_report_json_is_flat() {
        let ctx = RequestContext::new(Utc.with_ymd_and_hms(2024, 6, 15, 9, 0, 0).unwrap());
        let counters = CacheCounters {
            hits: 2,
            ..Default::default()
        };
        let json = serde_json::to_value(CacheStatsReport::new(&ctx, false, 60, counters)).unwrap();

        assert_eq!(json["hits"], 2);
        assert_eq!(json["enabled"], false);
        assert_eq!(json["ttl_seconds"], 60);
        assert_eq!(json["hit_ratio"], 1.0);
    }
}
