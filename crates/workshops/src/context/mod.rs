//! Request-scoped context module.
//!
//! Provides the `RequestScope` extractor that builds a
//! `workshops_core::context::RequestContext` for each request, to complement
//! the application-scoped `AppState`.

mod extractor;

pub use extractor::RequestScope;
