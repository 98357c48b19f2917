//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems emit tracing events
//!     → logging.rs (subscriber with env-filter)
//!     → stdout
//! ```
//!
//! # Design Decisions
//! - Structured fields (backend url, request id, counters) on every event
//!   touching a backend
//! - Level configurable via RUST_LOG, sensible default otherwise

pub mod logging;
