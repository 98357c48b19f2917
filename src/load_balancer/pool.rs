//! Backend pool management.
//!
//! # Responsibilities
//! - Own the ordered, fixed sequence of backends
//! - Apply the configured selection strategy
//! - Flip backend liveness by address on failover

use std::sync::Arc;

use url::Url;

use crate::config::BalancerConfig;
use crate::load_balancer::backend::{Backend, BackendError};
use crate::load_balancer::{strategy_for, SelectionError, SelectionStrategy};

/// Error building a backend from one configured address.
///
/// Non-fatal: pool construction logs the address and moves on.
#[derive(Debug, thiserror::Error)]
pub enum AddressError {
    #[error("invalid url: {0}")]
    Parse(#[from] url::ParseError),
    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// The fixed pool of upstream backends plus the active selection strategy.
///
/// The sequence is populated once at startup; its order defines the
/// round-robin cycle. Afterwards only the liveness flags of its elements
/// change.
#[derive(Debug)]
pub struct BackendPool {
    backends: Vec<Arc<Backend>>,
    strategy: Box<dyn SelectionStrategy>,
}

impl BackendPool {
    /// Create an empty pool with the given strategy.
    pub fn new(strategy: Box<dyn SelectionStrategy>) -> Self {
        Self {
            backends: Vec::new(),
            strategy,
        }
    }

    /// Build the pool from configuration.
    ///
    /// A malformed backend address is logged and skipped; construction
    /// continues with the remaining addresses.
    pub fn from_config(config: &BalancerConfig) -> Self {
        let mut pool = Self::new(strategy_for(&config.algorithm));

        for address in &config.backends {
            match build_backend(address) {
                Ok(backend) => pool.add_backend(backend),
                Err(error) => {
                    tracing::error!(
                        address = %address,
                        error = %error,
                        "Skipping malformed backend address"
                    );
                }
            }
        }

        pool
    }

    /// Append a backend to the sequence. Startup-time only: takes `&mut
    /// self`, so it cannot run concurrently with request handling.
    pub fn add_backend(&mut self, backend: Backend) {
        self.backends.push(Arc::new(backend));
    }

    /// Select the next backend via the active strategy.
    pub fn select(&self) -> Result<Arc<Backend>, SelectionError> {
        self.strategy.select_next(&self.backends)
    }

    /// Set the liveness of the backend with the given address. No-op when
    /// no backend matches.
    pub fn update_backend_status(&self, url: &Url, alive: bool) {
        for backend in &self.backends {
            if backend.url == *url {
                backend.set_alive(alive);
                break;
            }
        }
    }

    /// The full backend sequence, for health checking.
    pub fn backends(&self) -> &[Arc<Backend>] {
        &self.backends
    }

    pub fn len(&self) -> usize {
        self.backends.len()
    }

    pub fn is_empty(&self) -> bool {
        self.backends.is_empty()
    }
}

fn build_backend(address: &str) -> Result<Backend, AddressError> {
    let url = Url::parse(address)?;
    Ok(Backend::new(url)?)
}
