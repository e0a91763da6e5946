//! # Utils Module
//!
//! Request construction and response interpretation helpers.

pub mod envelope;
pub mod escape;
pub mod response;

// Re-export main functions for convenience
pub use envelope::{
    build_get, build_query, build_raw, build_remove, build_store, store_target, RequestEnvelope,
};
pub use escape::escape;
pub use response::{extract_query_time, interpret_response, ResponseError};
