use thiserror::Error;

/// Errors that can occur when validating a workshop.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WorkshopError {
    #[error("Workshop title cannot be empty")]
    EmptyTitle,
    #[error("Workshop title too long (max 120 characters)")]
    TitleTooLong,
    #[error("Workshop description too long (max 2000 characters)")]
    DescriptionTooLong,
    #[error("Workshop location too long (max 200 characters)")]
    LocationTooLong,
    #[error("Workshop capacity must be at least 1")]
    InvalidCapacity,
    #[error("Workshop must end after it starts")]
    InvalidTimeRange,
}
