//! Resilience subsystem: bounded retry and cross-backend failover.
//!
//! # Data Flow
//! ```text
//! Request dispatched to the pool:
//!     → attempt ceiling checked (terminal 503 when exceeded)
//!     → strategy selects a backend (terminal 503 when none alive)
//!     → bounded same-backend retry loop with a fixed backoff
//!     → on exhaustion: backend marked dead, attempts += 1, reselect
//! ```
//!
//! # Design Decisions
//! - Explicit loops, never recursion: the call stack stays flat no matter
//!   how often forwarding fails
//! - Per-request counters travel in an explicit struct, not a string-keyed
//!   context
//! - Only transport errors are failures; upstream status codes (including
//!   5xx) are relayed to the client verbatim
//! - The retry counter is monotonic for one logical request: it is not
//!   reset when failing over to a new backend

pub mod failover;

pub use failover::{dispatch, AttemptState, DispatchError};
