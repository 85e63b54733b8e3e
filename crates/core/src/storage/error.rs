use thiserror::Error;

use crate::search::SearchQueryError;
use crate::workshop::WorkshopError;

/// Errors that can occur during repository operations.
///
/// `Clone` so that one failed fetch can be handed to every caller waiting on
/// it.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("{entity_type} not found: {id}")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },
    #[error("{entity_type} already exists: {id}")]
    AlreadyExists {
        entity_type: &'static str,
        id: String,
    },
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),
    #[error("Invalid query: {0}")]
    QueryInvalid(String),
    #[error("Fetch timed out after {timeout_ms}ms")]
    FetchTimeout { timeout_ms: u64 },
    #[error("Write conflict on {entity_type} {id}: record was modified concurrently")]
    WriteConflict {
        entity_type: &'static str,
        id: String,
    },
    #[error("Invalid data: {0}")]
    InvalidData(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<WorkshopError> for RepositoryError {
    fn from(err: WorkshopError) -> Self {
        RepositoryError::InvalidData(err.to_string())
    }
}

impl From<SearchQueryError> for RepositoryError {
    fn from(err: SearchQueryError) -> Self {
        RepositoryError::QueryInvalid(err.to_string())
    }
}

/// Result type for repository operations.
pub type Result<T> = std::result::Result<T, RepositoryError>;
