//! Application state and composition root.
//!
//! Every long-lived component (storage backend, cache store, cached
//! decorator) is constructed here exactly once and shared by `Arc`. Nothing
//! in here holds request-scoped data.

use std::sync::Arc;

use workshops_core::cache::CacheStatsReport;
use workshops_core::context::RequestContext;
use workshops_core::storage::WorkshopRepository;

use crate::cache::MemoryCache;
use crate::config::Config;
use crate::storage::{CacheSettings, CacheStats, CachedWorkshopRepository};

/// Shared application state.
///
/// Cloned for each request handler.
#[derive(Clone)]
pub struct AppState {
    /// Workshop repository (cached, wraps the configured backend).
    pub workshops: Arc<dyn WorkshopRepository>,
    /// Counters of the cached repository.
    pub cache_stats: Arc<CacheStats>,
    /// Settings the cached repository runs with.
    pub cache_settings: CacheSettings,
}

impl AppState {
    /// Wraps `repository` in a memory-backed read-through cache.
    pub fn with_repository<R>(
        repository: Arc<R>,
        cache_max_entries: usize,
        cache_settings: CacheSettings,
    ) -> Self
    where
        R: WorkshopRepository + 'static,
    {
        let cache = Arc::new(MemoryCache::new(cache_max_entries));
        let cached = CachedWorkshopRepository::new(repository, cache, cache_settings);

        tracing::debug!(
            enabled = cache_settings.enabled,
            ttl_seconds = cache_settings.ttl.as_secs(),
            fetch_timeout_ms =
                u64::try_from(cache_settings.fetch_timeout.as_millis()).unwrap_or(u64::MAX),
            max_entries = cache_max_entries,
            "Cached workshop repository ready"
        );

        Self {
            cache_stats: cached.stats(),
            workshops: Arc::new(cached),
            cache_settings,
        }
    }

    /// Cache statistics stamped with the caller's clock and request id.
    pub fn cache_report(&self, ctx: &RequestContext) -> CacheStatsReport {
        self.cache_stats.report(ctx, &self.cache_settings)
    }
}

// ============================================================================
// Factory functions for different backends
// ============================================================================

#[cfg(feature = "inmemory")]
mod inmemory_memory {
    use super::*;
    use chrono::Utc;

    use crate::storage::{seed_workshops, InMemoryRepository};

    impl AppState {
        /// Creates AppState with in-memory storage and in-memory cache.
        pub async fn new(config: &Config, seed: bool) -> Result<Self, anyhow::Error> {
            let repository = if seed {
                let workshops = seed_workshops(Utc::now());
                tracing::info!(count = workshops.len(), "Seeding in-memory store");
                InMemoryRepository::with_workshops(workshops)
            } else {
                InMemoryRepository::new()
            };

            Ok(Self::with_repository(
                Arc::new(repository),
                config.cache_max_entries,
                config.cache_settings(),
            ))
        }
    }
}

#[cfg(feature = "sqlite")]
mod sqlite_memory {
    use super::*;
    use chrono::Utc;

    use workshops_core::storage::RepositoryError;
    use workshops_core::workshop::WorkshopCommand;

    use crate::storage::{seed_workshops, SqliteRepository};

    impl AppState {
        /// Creates AppState with SQLite storage and in-memory cache.
        pub async fn new(config: &Config, seed: bool) -> Result<Self, anyhow::Error> {
            let repository = Arc::new(SqliteRepository::new(&config.sqlite_path).await?);

            if seed {
                let ctx = RequestContext::new(Utc::now());
                for workshop in seed_workshops(ctx.now) {
                    match repository
                        .write_workshop(&ctx, &WorkshopCommand::Create(workshop))
                        .await
                    {
                        Ok(_) | Err(RepositoryError::AlreadyExists { .. }) => {}
                        Err(err) => return Err(err.into()),
                    }
                }
                tracing::info!(path = %config.sqlite_path, "Seeded SQLite store");
            }

            Ok(Self::with_repository(
                repository,
                config.cache_max_entries,
                config.cache_settings(),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    use workshops_core::search::SearchQuery;

    use crate::storage::InMemoryRepository;

    #[test]
    fn test_app_state_is_send_sync_static() {
        fn assert_shareable<T: Send + Sync + 'static>() {}
        assert_shareable::<AppState>();
    }

    #[tokio::test]
    async fn test_cache_report_uses_caller_context() {
        let state = AppState::with_repository(
            Arc::new(InMemoryRepository::new()),
            100,
            CacheSettings::default(),
        );

        let ctx = RequestContext::new(Utc::now());
        state
            .workshops
            .search_workshops(&ctx, &SearchQuery::new("react"))
            .await
            .unwrap();
        state
            .workshops
            .search_workshops(&ctx, &SearchQuery::new("react"))
            .await
            .unwrap();

        let first = RequestContext::new(Utc.with_ymd_and_hms(2024, 6, 15, 9, 0, 0).unwrap());
        let second = RequestContext::new(Utc.with_ymd_and_hms(2024, 6, 16, 9, 0, 0).unwrap());

        let a = state.cache_report(&first);
        let b = state.cache_report(&second);

        assert_eq!(a.generated_at, first.now);
        assert_eq!(b.generated_at, second.now);
        assert_ne!(a.request_id, b.request_id);
        assert_eq!(a.counters.hits, 1);
        assert_eq!(a.counters.misses, 1);
        assert_eq!(a.ttl_seconds, 300);
    }

    #[cfg(feature = "inmemory")]
    #[tokio::test]
    async fn test_new_with_seed() {
        let config = Config {
            cache_ttl_seconds: 300,
            cache_max_entries: 100,
            cache_enabled: true,
            cache_fetch_timeout_ms: 5_000,
            sqlite_path: "unused.db".to_string(),
        };
        let state = AppState::new(&config, true).await.unwrap();

        let ctx = RequestContext::new(Utc::now());
        let results = state
            .workshops
            .search_workshops(&ctx, &SearchQuery::new("react"))
            .await
            .unwrap();
        assert_eq!(results.len(), 3);
    }
}
