//! Storage backend implementations.
//!
//! Concrete implementations of `workshops_core::storage::WorkshopRepository`,
//! selected at compile time via feature flags, plus the cached decorator that
//! wraps whichever one is active.
//!
//! # Feature Flags
//!
//! - `inmemory` (default): `HashMap` backend, optionally seeded with sample data
//! - `sqlite`: SQLite backend using `rusqlite` and `tokio-rusqlite`
//!
//! These features are mutually exclusive - only one storage backend can be
//! enabled at a time.
//!
//! # Examples
//!
//! Build with the in-memory backend (default):
//! ```bash
//! cargo build -p workshops
//! ```
//!
//! Build with SQLite:
//! ```bash
//! cargo build -p workshops --no-default-features --features sqlite
//! ```

// Compile-time checks for mutual exclusivity
#[cfg(all(feature = "inmemory", feature = "sqlite"))]
compile_error!(
    "Features 'inmemory' and 'sqlite' are mutually exclusive. \
    Enable only one storage backend at a time."
);

#[cfg(not(any(feature = "inmemory", feature = "sqlite")))]
compile_error!(
    "No storage backend selected. Enable 'inmemory' or 'sqlite' feature. \
    Example: cargo build -p workshops --features sqlite"
);

pub mod cached;
mod seed;

// Also compiled for tests: handler tests run against it whatever the backend.
#[cfg(any(feature = "inmemory", test))]
pub mod inmemory;

#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use cached::{CacheSettings, CacheStats, CachedWorkshopRepository};
pub use seed::seed_workshops;

#[cfg(any(feature = "inmemory", test))]
pub use inmemory::InMemoryRepository;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteRepository;
