//! Pure validation functions for workshops.

use super::{Workshop, WorkshopError};

pub const MAX_TITLE_LEN: usize = 120;
pub const MAX_DESCRIPTION_LEN: usize = 2000;
pub const MAX_LOCATION_LEN: usize = 200;

/// Validates a workshop before it is written.
pub fn validate_workshop(workshop: &Workshop) -> Result<(), WorkshopError> {
    if workshop.title.trim().is_empty() {
        return Err(WorkshopError::EmptyTitle);
    }
    if workshop.title.chars().count() > MAX_TITLE_LEN {
        return Err(WorkshopError::TitleTooLong);
    }
    if workshop
        .description
        .as_ref()
        .is_some_and(|d| d.chars().count() > MAX_DESCRIPTION_LEN)
    {
        return Err(WorkshopError::DescriptionTooLong);
    }
    if workshop
        .location
        .as_ref()
        .is_some_and(|l| l.chars().count() > MAX_LOCATION_LEN)
    {
        return Err(WorkshopError::LocationTooLong);
    }
    if workshop.capacity == 0 {
        return Err(WorkshopError::InvalidCapacity);
    }
    if workshop.end_at <= workshop.start_at {
        return Err(WorkshopError::InvalidTimeRange);
    }
    Ok(())
}
