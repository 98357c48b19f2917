//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (main.rs):
//!     Parse flags → build config → build pool/server → serve
//!
//! Shutdown (shutdown.rs):
//!     Ctrl+C received → Shutdown::trigger
//!     → server stops accepting, health monitor exits its loop
//! ```
//!
//! # Design Decisions
//! - One broadcast channel fans the signal out to every long-lived task
//! - Tests drive the same trigger the Ctrl+C waiter uses

pub mod shutdown;

pub use shutdown::Shutdown;
