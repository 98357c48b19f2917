//! Active health checking.
//!
//! # Responsibilities
//! - Periodically probe every backend in the pool
//! - Delegate liveness updates to `Backend::probe`

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::time;

use crate::config::HealthCheckConfig;
use crate::load_balancer::pool::BackendPool;

/// Periodic health monitor for the backend pool.
pub struct HealthMonitor {
    pool: Arc<BackendPool>,
    config: HealthCheckConfig,
}

impl HealthMonitor {
    pub fn new(pool: Arc<BackendPool>, config: HealthCheckConfig) -> Self {
        Self { pool, config }
    }

    /// Run the health check loop until shutdown.
    pub async fn run(self, mut shutdown: broadcast::Receiver<()>) {
        if !self.config.enabled {
            tracing::info!("Active health checks disabled");
            return;
        }

        tracing::info!(
            interval_secs = self.config.interval_secs,
            path = %self.config.path,
            "Health monitor starting"
        );

        let mut ticker = time::interval(Duration::from_secs(self.config.interval_secs));
        // The first tick fires immediately; skip it so backends keep their
        // startup liveness until a full interval has passed.
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.check_all().await;
                }
                _ = shutdown.recv() => {
                    tracing::info!("Health monitor received shutdown signal, exiting loop");
                    break;
                }
            }
        }
    }

    /// Probe every backend, strictly in sequence. A slow probe delays the
    /// ones after it within this sweep, bounded by the per-probe timeout.
    async fn check_all(&self) {
        tracing::info!("Starting health check");

        let timeout = Duration::from_secs(self.config.timeout_secs);
        for backend in self.pool.backends() {
            backend.probe(&self.config.path, timeout).await;
        }

        tracing::info!("Finishing health check");
    }
}
