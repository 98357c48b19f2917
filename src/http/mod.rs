//! HTTP entry point subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, any-path handler)
//!     → attach request id, buffer body for replay
//!     → resilience::dispatch (select backend, retry, fail over)
//!     → upstream response relayed to the client
//! ```
//!
//! # Design Decisions
//! - One handler for every path and method, /ping included; there is no
//!   separate code path that bypasses the pool
//! - Bodies are buffered up front so retries can replay them
//! - Terminal failures answer 503 "Service not available"

pub mod server;

pub use server::HttpServer;
