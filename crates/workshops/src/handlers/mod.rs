pub mod analytics;
pub mod authz;
pub mod error;
pub mod health;
pub mod workshops;

pub use error::AppError;
