//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! CLI flags (clap, in main.rs)
//!     → optional config file (loader.rs, TOML)
//!     → flag values override file values
//!     → BalancerConfig (immutable, shared via clone)
//! ```
//!
//! # Design Decisions
//! - Config is immutable once the server starts; no runtime reload
//! - Every field has a default so flags alone are enough
//! - A malformed backend address is a per-address skip, not a startup
//!   failure; an empty backend list is fatal

pub mod loader;
pub mod schema;

pub use loader::{load_config, ConfigError};
pub use schema::{BalancerConfig, HealthCheckConfig, RetryConfig};
