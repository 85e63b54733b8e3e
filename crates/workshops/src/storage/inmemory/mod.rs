//! In-memory storage backend for tests and development.
//!
//! Stores workshops in a `HashMap` wrapped in `Arc<RwLock<_>>`. Data is lost
//! when the process exits.

mod repository;

pub use repository::InMemoryRepository;
