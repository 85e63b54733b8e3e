//! Core types and traits for the workshops service.
//!
//! Everything in this crate is pure data or pure functions: no I/O, no
//! runtime. Storage and cache backends live in the `workshops` binary crate
//! and implement the traits defined here.

pub mod cache;
pub mod context;
pub mod search;
pub mod storage;
pub mod workshop;
