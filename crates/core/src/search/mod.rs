mod normalize;
mod types;

pub use normalize::{normalize, normalize_text};
pub use types::{Attendance, SearchFilter, SearchQuery, SearchQueryError};
