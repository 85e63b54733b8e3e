//! Cached workshop repository decorator.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures_util::future::{BoxFuture, FutureExt};
use serde::{de::DeserializeOwned, Serialize};
use tokio::sync::RwLock;
use uuid::Uuid;

use workshops_core::cache::{
    from_cache_bytes, invalidation_targets, to_cache_bytes, workshop_key, Cache, CacheKey,
};
use workshops_core::context::RequestContext;
use workshops_core::search::{normalize, SearchQuery};
use workshops_core::storage::{RepositoryError, Result, WorkshopRepository};
use workshops_core::workshop::{Workshop, WorkshopCommand, WriteResult};

use super::flight::SingleFlight;
use super::stats::CacheStats;

/// Read-through settings, fixed at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheSettings {
    /// Time-to-live for cached results.
    pub ttl: Duration,
    /// Upper bound on a single fetch from the wrapped repository.
    pub fetch_timeout: Duration,
    /// When false every call goes straight to the wrapped repository.
    pub enabled: bool,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(300),
            fetch_timeout: Duration::from_secs(5),
            enabled: true,
        }
    }
}

/// Collaborators shared with spawned fetch and write tasks.
struct Backing<R, C> {
    repository: Arc<R>,
    cache: Arc<C>,
    settings: CacheSettings,
    stats: Arc<CacheStats>,
    searches: SingleFlight<Vec<Workshop>>,
    lookups: SingleFlight<Option<Workshop>>,
    /// Bumped by every invalidation. A fill only lands if the epoch it read
    /// before fetching is still current.
    epoch: RwLock<u64>,
}

/// Cached workshop repository decorator.
///
/// Long-lived: constructed once at startup and shared by every request. It
/// holds only process-wide collaborators; request-scoped values arrive
/// through the `RequestContext` argument of each call.
///
/// # Type Parameters
///
/// * `R` - The underlying repository implementation
/// * `C` - The cache implementation
pub struct CachedWorkshopRepository<R, C>
where
    R: WorkshopRepository,
    C: Cache,
{
    backing: Arc<Backing<R, C>>,
}

impl<R, C> CachedWorkshopRepository<R, C>
where
    R: WorkshopRepository + 'static,
    C: Cache + 'static,
{
    /// Creates a new cached workshop repository.
    ///
    /// # Arguments
    ///
    /// * `repository` - The underlying repository to cache
    /// * `cache` - The cache implementation
    /// * `settings` - TTL, fetch timeout and on/off switch
    pub fn new(repository: Arc<R>, cache: Arc<C>, settings: CacheSettings) -> Self {
        Self {
            backing: Arc::new(Backing {
                repository,
                cache,
                settings,
                stats: Arc::new(CacheStats::new()),
                searches: SingleFlight::new(),
                lookups: SingleFlight::new(),
                epoch: RwLock::new(0),
            }),
        }
    }

    /// Counters shared with whoever reports on them.
    pub fn stats(&self) -> Arc<CacheStats> {
        Arc::clone(&self.backing.stats)
    }

    /// Serves `key` from the cache, or joins/starts the single fetch for it.
    async fn read_through<T, F>(
        &self,
        ctx: &RequestContext,
        key: CacheKey,
        flights: &SingleFlight<T>,
        cacheable: fn(&T) -> bool,
        fetch: F,
    ) -> Result<T>
    where
        T: Serialize + DeserializeOwned + Clone + Send + Sync + 'static,
        F: FnOnce(Arc<R>, RequestContext) -> BoxFuture<'static, Result<T>> + Send + 'static,
    {
        if let Some(value) = self.backing.cached_value(ctx, &key).await {
            return Ok(value);
        }

        let joined = flights.join_or_start(key.as_str(), || {
            let backing = Arc::clone(&self.backing);
            let ctx = ctx.clone();
            let key = key.clone();
            async move { backing.fetch_and_fill(ctx, key, cacheable, fetch).await }.boxed()
        });

        if joined.leader {
            self.backing.stats.record_miss();
            tracing::debug!(request_id = %ctx.request_id, %key, "Cache miss, fetching");
        } else {
            self.backing.stats.record_collapsed();
            tracing::debug!(
                request_id = %ctx.request_id,
                %key,
                collapsed = true,
                "Joined in-flight fetch"
            );
        }

        joined.fetch.await
    }
}

impl<R, C> Backing<R, C>
where
    R: WorkshopRepository + 'static,
    C: Cache + 'static,
{
    /// Removes every entry `command` may have made stale.
    ///
    /// Runs under the epoch write lock: fills from fetches that started
    /// before this point are rejected, and in-flight fetches for the affected
    /// keys are detached so later readers start fresh ones.
    async fn invalidate(&self, ctx: &RequestContext, command: &WorkshopCommand) {
        let targets = invalidation_targets(command);

        let mut epoch = self.epoch.write().await;
        *epoch = epoch.wrapping_add(1);

        let detached = self.searches.detach(&targets) + self.lookups.detach(&targets);

        for key in &targets.keys {
            if let Err(err) = self.cache.delete(key.as_str()).await {
                self.stats.record_cache_error();
                tracing::warn!(%key, error = %err, "Failed to invalidate cache key");
            }
        }
        for pattern in &targets.patterns {
            if let Err(err) = self.cache.delete_pattern(pattern).await {
                self.stats.record_cache_error();
                tracing::warn!(%pattern, error = %err, "Failed to invalidate cache pattern");
            }
        }

        self.stats.record_invalidation();
        tracing::debug!(
            request_id = %ctx.request_id,
            workshop_id = %command.workshop_id(),
            detached,
            epoch = *epoch,
            "Invalidated cache after write"
        );
    }

    /// Looks `key` up in the cache. Cache failures count as a miss.
    async fn cached_value<T: DeserializeOwned>(
        &self,
        ctx: &RequestContext,
        key: &CacheKey,
    ) -> Option<T> {
        match self.cache.get(key.as_str()).await {
            Ok(Some(bytes)) => match from_cache_bytes(&bytes) {
                Ok(value) => {
                    self.stats.record_hit();
                    tracing::trace!(request_id = %ctx.request_id, %key, "Cache hit");
                    Some(value)
                }
                Err(err) => {
                    self.stats.record_cache_error();
                    tracing::warn!(%key, error = %err, "Cached value failed to decode");
                    None
                }
            },
            Ok(None) => None,
            Err(err) => {
                self.stats.record_cache_error();
                tracing::warn!(%key, error = %err, "Cache read failed, falling back to store");
                None
            }
        }
    }

    /// Body of a spawned fetch: call the repository within the timeout and
    /// store a cacheable success.
    async fn fetch_and_fill<T, F>(
        self: Arc<Self>,
        ctx: RequestContext,
        key: CacheKey,
        cacheable: fn(&T) -> bool,
        fetch: F,
    ) -> Result<T>
    where
        T: Serialize + Send + Sync,
        F: FnOnce(Arc<R>, RequestContext) -> BoxFuture<'static, Result<T>>,
    {
        let started = *self.epoch.read().await;
        let timeout = self.settings.fetch_timeout;

        let result = match tokio::time::timeout(
            timeout,
            fetch(Arc::clone(&self.repository), ctx.clone()),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => Err(RepositoryError::FetchTimeout {
                timeout_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
            }),
        };

        match &result {
            Ok(value) if cacheable(value) => self.fill(&key, value, started).await,
            Ok(_) => {}
            Err(err) => {
                self.stats.record_fetch_failure();
                tracing::warn!(
                    request_id = %ctx.request_id,
                    %key,
                    error = %err,
                    "Fetch failed, nothing cached"
                );
            }
        }

        result
    }

    /// Stores `value` unless an invalidation ran since `started` was read.
    async fn fill<T: Serialize>(&self, key: &CacheKey, value: &T, started: u64) {
        // Held across `set` so an invalidation cannot slip in between the
        // check and the write.
        let epoch = self.epoch.read().await;
        if *epoch != started {
            self.stats.record_discarded_fill();
            tracing::debug!(%key, "Discarding fill invalidated mid-fetch");
            return;
        }

        let bytes = match to_cache_bytes(value) {
            Ok(bytes) => bytes,
            Err(err) => {
                self.stats.record_cache_error();
                tracing::warn!(%key, error = %err, "Failed to encode value for cache");
                return;
            }
        };

        match self.cache.set(key.as_str(), &bytes, Some(self.settings.ttl)).await {
            Ok(()) => self.stats.record_fill(),
            Err(err) => {
                self.stats.record_cache_error();
                tracing::warn!(%key, error = %err, "Failed to populate cache");
            }
        }
    }
}

#[async_trait]
impl<R, C> WorkshopRepository for CachedWorkshopRepository<R, C>
where
    R: WorkshopRepository + 'static,
    C: Cache + 'static,
{
    async fn search_workshops(
        &self,
        ctx: &RequestContext,
        query: &SearchQuery,
    ) -> Result<Vec<Workshop>> {
        if !self.backing.settings.enabled {
            self.backing.stats.record_bypass();
            return self.backing.repository.search_workshops(ctx, query).await;
        }

        let key = normalize(query);
        let query = query.clone();
        let workshops = self
            .read_through(ctx, key, &self.backing.searches, |_| true, move |repo, ctx| {
                async move { repo.search_workshops(&ctx, &query).await }.boxed()
            })
            .await?;

        tracing::trace!(request_id = %ctx.request_id, count = workshops.len(), "Search served");
        Ok(workshops)
    }

    async fn get_workshop(&self, ctx: &RequestContext, id: Uuid) -> Result<Option<Workshop>> {
        if !self.backing.settings.enabled {
            self.backing.stats.record_bypass();
            return self.backing.repository.get_workshop(ctx, id).await;
        }

        // Absent workshops are not cached: a create for this id needs no
        // special handling.
        self.read_through(
            ctx,
            workshop_key(id),
            &self.backing.lookups,
            Option::is_some,
            move |repo, ctx| async move { repo.get_workshop(&ctx, id).await }.boxed(),
        )
        .await
    }

    async fn write_workshop(
        &self,
        ctx: &RequestContext,
        command: &WorkshopCommand,
    ) -> Result<WriteResult> {
        // Store write and invalidation run as one task: a caller dropped
        // after the commit must not leave stale entries behind.
        let backing = Arc::clone(&self.backing);
        let task_ctx = ctx.clone();
        let task_command = command.clone();
        let handle = tokio::spawn(async move {
            let result = backing
                .repository
                .write_workshop(&task_ctx, &task_command)
                .await?;
            if backing.settings.enabled {
                backing.invalidate(&task_ctx, &task_command).await;
            }
            Ok::<_, RepositoryError>(result)
        });

        let result = handle.await.unwrap_or_else(|err| {
            Err(RepositoryError::StoreUnavailable(format!(
                "write task failed: {err}"
            )))
        })?;

        tracing::debug!(
            request_id = %ctx.request_id,
            workshop_id = %result.id,
            operation = ?result.operation,
            "Workshop written"
        );
        Ok(result)
    }
}
