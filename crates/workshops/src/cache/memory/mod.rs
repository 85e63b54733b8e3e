//! In-memory cache backend.
//!
//! A process-wide key/value store with TTL support and optional LRU bound.

mod cache;

pub use cache::MemoryCache;
