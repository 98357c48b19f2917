//! Load balancing subsystem.
//!
//! # Data Flow
//! ```text
//! Inbound request → pool.rs (BackendPool::select)
//!     → SelectionStrategy picks a candidate:
//!         - round_robin.rs (rotate through alive backends)
//!     → backend.rs (forward through the backend's owned client)
//!     → Response or error back to the retry/failover layer
//! ```
//!
//! # Design Decisions
//! - Backend sequence is fixed after startup; only liveness flags mutate
//! - Strategy state lives inside the strategy instance, never exposed
//! - Dead backends are skipped by selection, never removed from the pool
//! - One forwarding client per backend, bound for the process lifetime

pub mod backend;
pub mod pool;
pub mod round_robin;

use std::sync::Arc;

use crate::load_balancer::backend::Backend;
use crate::load_balancer::round_robin::RoundRobin;

/// Strategy name recognized by [`strategy_for`].
pub const ALGORITHM_ROUND_ROBIN: &str = "round-robin";

/// Error returned when selection cannot produce a backend.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SelectionError {
    /// Every candidate is dead, or the candidate sequence is empty.
    #[error("no backend is alive")]
    NoBackendAlive,
}

/// A backend selection strategy.
///
/// Instances are shared across all concurrent requests and may only mutate
/// their own internal state. The candidate slice is not guaranteed to be
/// non-empty; implementations must handle the empty case explicitly.
pub trait SelectionStrategy: Send + Sync + std::fmt::Debug {
    /// Choose the next backend from the ordered candidate sequence.
    fn select_next(&self, backends: &[Arc<Backend>]) -> Result<Arc<Backend>, SelectionError>;
}

/// Build the strategy for a configured name.
///
/// An unrecognized name falls back to round-robin with a warning; this is
/// deliberately not an error.
pub fn strategy_for(name: &str) -> Box<dyn SelectionStrategy> {
    match name {
        ALGORITHM_ROUND_ROBIN => Box::new(RoundRobin::new()),
        other => {
            tracing::warn!(
                algorithm = %other,
                "Unknown selection algorithm, falling back to round-robin"
            );
            Box::new(RoundRobin::new())
        }
    }
}
