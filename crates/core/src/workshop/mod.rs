mod error;
mod operations;
mod requests;
mod types;

pub use error::WorkshopError;
pub use operations::{
    validate_workshop, MAX_DESCRIPTION_LEN, MAX_LOCATION_LEN, MAX_TITLE_LEN,
};
pub use requests::{CreateWorkshopRequest, UpdateWorkshopRequest};
pub use types::{Workshop, WorkshopCommand, WriteOperation, WriteResult, DEFAULT_CAPACITY};
