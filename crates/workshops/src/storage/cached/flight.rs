//! Single-flight bookkeeping for cache misses.
//!
//! One slot per key with a fetch in progress. The first caller for a key
//! spawns the fetch and every later caller awaits the same shared future. The
//! fetch runs as its own task, so dropping any caller (including the one that
//! started it) never cancels it.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use futures_util::future::{BoxFuture, FutureExt, Shared};

use workshops_core::cache::{pattern_matches, InvalidationTargets};
use workshops_core::storage::{RepositoryError, Result};

/// A fetch that any number of callers can await.
pub type SharedFetch<T> = Shared<BoxFuture<'static, Result<T>>>;

struct Slot<T> {
    id: u64,
    fetch: SharedFetch<T>,
}

/// Outcome of [`SingleFlight::join_or_start`].
pub struct Joined<T> {
    pub fetch: SharedFetch<T>,
    /// True if this caller started the fetch.
    pub leader: bool,
}

/// Map of in-flight fetches keyed by cache key.
///
/// Sharded (`DashMap`), so callers on different keys never contend on one
/// lock.
pub struct SingleFlight<T> {
    slots: Arc<DashMap<String, Slot<T>>>,
    next_id: AtomicU64,
}

impl<T> Default for SingleFlight<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> SingleFlight<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self {
            slots: Arc::new(DashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Joins the fetch in flight for `key`, or spawns `start()` as a new one.
    ///
    /// The slot is released when the spawned task finishes, whatever the
    /// outcome, and only if it has not been replaced in the meantime. Must be
    /// called from within a Tokio runtime.
    pub fn join_or_start<F>(&self, key: &str, start: F) -> Joined<T>
    where
        F: FnOnce() -> BoxFuture<'static, Result<T>>,
    {
        match self.slots.entry(key.to_string()) {
            Entry::Occupied(slot) => Joined {
                fetch: slot.get().fetch.clone(),
                leader: false,
            },
            Entry::Vacant(vacant) => {
                let id = self.next_id.fetch_add(1, Ordering::Relaxed);
                let release = SlotRelease {
                    slots: Arc::clone(&self.slots),
                    key: key.to_string(),
                    id,
                };
                let task = start();
                let handle = tokio::spawn(async move {
                    let _release = release;
                    task.await
                });

                let fetch = async move {
                    handle.await.unwrap_or_else(|err| {
                        Err(RepositoryError::StoreUnavailable(format!(
                            "fetch task failed: {err}"
                        )))
                    })
                }
                .boxed()
                .shared();

                vacant.insert(Slot {
                    id,
                    fetch: fetch.clone(),
                });
                Joined {
                    fetch,
                    leader: true,
                }
            }
        }
    }

    /// Detaches every in-flight fetch whose key is covered by `targets`.
    ///
    /// Detached fetches keep running for the callers already waiting on them,
    /// but later callers start a fresh fetch. Returns the number detached.
    pub fn detach(&self, targets: &InvalidationTargets) -> usize {
        let before = self.slots.len();
        self.slots.retain(|key, _| {
            let exact = targets.keys.iter().any(|k| k.as_str() == key);
            let pattern = targets.patterns.iter().any(|p| pattern_matches(p, key));
            !(exact || pattern)
        });
        before.saturating_sub(self.slots.len())
    }

    /// Number of keys with a fetch in flight.
    pub fn in_flight(&self) -> usize {
        self.slots.len()
    }
}

/// Removes a slot when its fetch task ends, unless a newer fetch took over.
struct SlotRelease<T> {
    slots: Arc<DashMap<String, Slot<T>>>,
    key: String,
    id: u64,
}

impl<T> Drop for SlotRelease<T> {
    fn drop(&mut self) {
        self.slots.remove_if(&self.key, |_, slot| slot.id == self.id);
    }
}
