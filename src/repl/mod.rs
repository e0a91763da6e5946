//! # REPL Module
//!
//! The command interpreter and the request/response layer behind it.
//!
//! ```text
//! ┌──────────────┐   line    ┌──────────────┐  envelope  ┌─────────────┐
//! │ Controller   │──────────▶│   Commands   │───────────▶│  Transport  │
//! │              │           │              │            │             │
//! │ - read loop  │           │ - find, get  │◀───────────│ - HTTP      │
//! │ - dispatch   │           │ - display …  │  response  │ - mock      │
//! └──────────────┘           └──────┬───────┘            └─────────────┘
//!                                   │ mutates
//!                                   ▼
//!                            ┌──────────────┐
//!                            │ SessionState │
//!                            └──────────────┘
//! ```

pub mod commands;
pub mod controller;
pub mod services;
pub mod session;
pub mod utils;

// Re-export core types
pub use commands::{Command, CommandContext, CommandOutcome, CommandRegistry};
pub use controller::{ReplController, ReplState};
pub use services::{
    BenchmarkRecord, BenchmarkRunner, HttpTransport, HttpTransportConfig, MockTransport,
    QueryTiming, Transport, TransportError, TransportResponse,
};
pub use session::{DisplayMode, SessionState};
pub use utils::{RequestEnvelope, ResponseError};
