//! Health checking subsystem.
//!
//! # Data Flow
//! ```text
//! Active health checks (active.rs):
//!     Periodic timer
//!     → Probe each backend sequentially (GET {backend}/healthcheck)
//!     → Backend::probe updates the liveness flag
//!
//! Failover path (resilience subsystem):
//!     Retries exhausted against a backend
//!     → BackendPool::update_backend_status marks it dead
//!     → Next successful probe revives it
//! ```
//!
//! # Design Decisions
//! - One background task, one sweep per tick, no overlap between backends
//! - A single probe outcome flips liveness; no hysteresis thresholds
//! - Every probe outcome is logged, not only transitions
//! - Per-probe timeout keeps one hung backend from stalling the sweep

pub mod active;
