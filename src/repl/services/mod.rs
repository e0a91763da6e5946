//! # Services Layer
//!
//! Provides the operations commands build on: talking to the repository
//! and running query benchmarks.

pub mod bench;
pub mod http;
pub mod mock;

// Re-export service types
pub use bench::{BenchmarkRecord, BenchmarkRunner, QueryTiming};
pub use http::{
    HttpTransport, HttpTransportConfig, Transport, TransportError, TransportResponse,
};
pub use mock::{MockTransport, SentRequest};
