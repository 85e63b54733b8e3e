//! Request-scoped context.
//!
//! Values here live for exactly one request. Long-lived components receive
//! them as call parameters and never store them.

mod types;

pub use types::{Actor, RequestContext, RequestId, Role};
