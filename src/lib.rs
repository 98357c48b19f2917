//! HTTP load balancer library.
//!
//! Distributes inbound HTTP requests across a fixed pool of upstream
//! backends. A pluggable [`load_balancer::SelectionStrategy`] (round-robin
//! shipped) picks the backend for each request, a periodic
//! [`health::active::HealthMonitor`] tracks liveness, and the
//! [`resilience`] layer retries a failing backend a bounded number of
//! times before marking it dead and failing over to the next one.

pub mod config;
pub mod http;

pub mod health;
pub mod load_balancer;

pub mod lifecycle;
pub mod observability;
pub mod resilience;

pub use config::BalancerConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
