//! Configuration schema definitions.
//!
//! All types derive Serde traits so a config file can supply any subset of
//! fields; everything has a default so the balancer runs from CLI flags
//! alone.

use serde::{Deserialize, Serialize};

use crate::load_balancer::ALGORITHM_ROUND_ROBIN;

/// Root configuration for the load balancer.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BalancerConfig {
    /// Listen address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Upstream backend addresses, in round-robin cycle order.
    pub backends: Vec<String>,

    /// Selection algorithm name. Unknown names fall back to round-robin.
    pub algorithm: String,

    /// Health check settings.
    pub health_check: HealthCheckConfig,

    /// Retry and failover settings.
    pub retries: RetryConfig,
}

impl Default for BalancerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            backends: Vec::new(),
            algorithm: ALGORITHM_ROUND_ROBIN.to_string(),
            health_check: HealthCheckConfig::default(),
            retries: RetryConfig::default(),
        }
    }
}

/// Health check configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HealthCheckConfig {
    /// Enable the periodic health check loop.
    pub enabled: bool,

    /// Seconds between health check sweeps.
    pub interval_secs: u64,

    /// Per-probe timeout in seconds. A probe that exceeds it counts as a
    /// failed probe instead of stalling the whole sweep.
    pub timeout_secs: u64,

    /// Path probed on each backend.
    pub path: String,
}

impl Default for HealthCheckConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_secs: 60,
            timeout_secs: 5,
            path: "/healthcheck".to_string(),
        }
    }
}

/// Retry and failover configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Maximum retries against the same backend for one request.
    pub max_retries: u32,

    /// Maximum failovers (distinct backend selections) for one request.
    pub max_attempts: u32,

    /// Fixed delay between same-backend retries, in milliseconds.
    pub backoff_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            max_attempts: 3,
            backoff_ms: 10,
        }
    }
}
