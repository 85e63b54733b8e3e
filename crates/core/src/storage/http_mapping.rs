//! Pure functions for mapping repository errors to HTTP status codes.

use super::RepositoryError;

/// Maps a [`RepositoryError`] to an HTTP status code.
///
/// - `NotFound` -> 404 (Not Found)
/// - `AlreadyExists`, `WriteConflict` -> 409 (Conflict)
/// - `QueryInvalid`, `InvalidData` -> 400 (Bad Request)
/// - `StoreUnavailable` -> 503 (Service Unavailable)
/// - `FetchTimeout` -> 504 (Gateway Timeout)
/// - `Serialization` -> 500 (Internal Server Error)
///
/// # Examples
///
/// ```
/// use workshops_core::storage::{RepositoryError, repository_error_to_status_code};
///
/// let error = RepositoryError::NotFound {
///     entity_type: "Workshop",
///     id: "abc-123".to_string(),
/// };
/// assert_eq!(repository_error_to_status_code(&error), 404);
/// ```
pub fn repository_error_to_status_code(error: &RepositoryError) -> u16 {
    match error {
        RepositoryError::NotFound { .. } => 404,
        RepositoryError::AlreadyExists { .. } => 409,
        RepositoryError::WriteConflict { .. } => 409,
        RepositoryError::QueryInvalid(_) => 400,
        RepositoryError::InvalidData(_) => 400,
        RepositoryError::StoreUnavailable(_) => 503,
        RepositoryError::FetchTimeout { .. } => 504,
        RepositoryError::Serialization(_) => 500,
    }
}
