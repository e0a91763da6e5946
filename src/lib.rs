//! # existline - Command-line Client for eXist XML Repositories
//!
//! Query, fetch, store and remove documents in a remote repository over
//! HTTP, and time batches of queries.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐  commands  ┌──────────────┐  envelopes  ┌─────────────┐
//! │  main / CLI │───────────▶│     REPL     │────────────▶│  Transport  │
//! │             │            │              │             │             │
//! │ - flags     │            │ - dispatch   │◀────────────│ - reqwest   │
//! │ - profile   │            │ - session    │  responses  │ - timeout   │
//! └─────────────┘            └──────────────┘             └─────────────┘
//! ```

pub mod cmd_args;
pub mod config;
pub mod oneshot;
pub mod repl;

// Re-export main types for easy access
pub use repl::*;
