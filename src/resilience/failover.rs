//! Bounded same-backend retry and cross-backend failover.

use std::sync::Arc;
use std::time::Duration;

use axum::body::{Body, Bytes};
use axum::http::request::Parts;
use axum::http::{Request, Response};
use hyper::body::Incoming;
use tokio::time;

use crate::config::RetryConfig;
use crate::load_balancer::backend::{Backend, ForwardError};
use crate::load_balancer::pool::BackendPool;

/// Per-request counters, threaded through the forwarding call chain.
///
/// `retries` counts forwarding attempts repeated against the same backend;
/// `attempts` counts distinct backend selections (failovers). Both are
/// monotonically non-decreasing for one logical request.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct AttemptState {
    pub retries: u32,
    pub attempts: u32,
}

/// Terminal failure of the dispatch protocol. Both variants map to a
/// service-unavailable response; raw forwarding errors never surface here.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DispatchError {
    #[error("no backend is alive")]
    NoBackendAlive,
    #[error("max attempts reached")]
    AttemptsExceeded,
}

/// Drive one request through selection, retry, and failover.
///
/// The request is rebuilt from its buffered parts for every forwarding
/// attempt, so retries replay the original body.
pub async fn dispatch(
    pool: &BackendPool,
    config: &RetryConfig,
    parts: &Parts,
    body: &Bytes,
) -> Result<Response<Incoming>, DispatchError> {
    let mut state = AttemptState::default();

    loop {
        if state.attempts > config.max_attempts {
            tracing::warn!(
                attempts = state.attempts,
                path = %parts.uri.path(),
                "Max attempts reached, terminating request"
            );
            return Err(DispatchError::AttemptsExceeded);
        }

        let backend = pool.select().map_err(|error| {
            tracing::warn!(error = %error, path = %parts.uri.path(), "Backend selection failed");
            DispatchError::NoBackendAlive
        })?;

        match forward_with_retries(&backend, config, parts, body, &mut state).await {
            Ok(response) => return Ok(response),
            Err(error) => {
                tracing::warn!(
                    url = %backend.url,
                    error = %error,
                    retries = state.retries,
                    attempts = state.attempts,
                    "Retries exhausted, marking backend dead and failing over"
                );
                pool.update_backend_status(&backend.url, false);
                state.attempts += 1;
            }
        }
    }
}

/// Forward to one backend, retrying on transport errors until the retry
/// ceiling is hit. Returns the last error once retries are exhausted.
async fn forward_with_retries(
    backend: &Arc<Backend>,
    config: &RetryConfig,
    parts: &Parts,
    body: &Bytes,
    state: &mut AttemptState,
) -> Result<Response<Incoming>, ForwardError> {
    loop {
        let request = rebuild_request(parts, body);

        match backend.forward(request).await {
            Ok(response) => return Ok(response),
            Err(error) => {
                tracing::error!(
                    url = %backend.url,
                    error = %error,
                    retries = state.retries,
                    attempts = state.attempts,
                    "Error forwarding request to backend"
                );

                if state.retries >= config.max_retries {
                    return Err(error);
                }

                time::sleep(Duration::from_millis(config.backoff_ms)).await;
                state.retries += 1;
                tracing::info!(
                    url = %backend.url,
                    retry = state.retries,
                    "Retrying request against the same backend"
                );
            }
        }
    }
}

/// Rebuild a forwardable request from buffered parts and body.
fn rebuild_request(parts: &Parts, body: &Bytes) -> Request<Body> {
    let mut request = Request::new(Body::from(body.clone()));
    *request.method_mut() = parts.method.clone();
    *request.uri_mut() = parts.uri.clone();
    *request.version_mut() = parts.version;
    *request.headers_mut() = parts.headers.clone();
    request
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BalancerConfig;
    use tokio::net::TcpListener;

    /// Bind then drop listeners to get ports that refuse connections.
    async fn refused_addresses(count: usize) -> Vec<String> {
        let mut listeners = Vec::new();
        for _ in 0..count {
            listeners.push(TcpListener::bind("127.0.0.1:0").await.unwrap());
        }
        listeners
            .iter()
            .map(|l| format!("http://127.0.0.1:{}", l.local_addr().unwrap().port()))
            .collect()
    }

    fn pool_for(addresses: Vec<String>) -> BackendPool {
        let config = BalancerConfig {
            backends: addresses,
            ..BalancerConfig::default()
        };
        BackendPool::from_config(&config)
    }

    fn fast_retries() -> RetryConfig {
        RetryConfig {
            max_retries: 0,
            max_attempts: 3,
            backoff_ms: 0,
        }
    }

    fn request_parts() -> (Parts, Bytes) {
        let (parts, _) = Request::builder()
            .method("GET")
            .uri("http://placeholder/ping")
            .body(Body::empty())
            .unwrap()
            .into_parts();
        (parts, Bytes::new())
    }

    #[test]
    fn counters_default_to_zero() {
        let state = AttemptState::default();
        assert_eq!(state.retries, 0);
        assert_eq!(state.attempts, 0);
    }

    #[tokio::test]
    async fn unreachable_backend_is_marked_dead_then_pool_is_exhausted() {
        let pool = pool_for(refused_addresses(1).await);
        let (parts, body) = request_parts();

        let err = dispatch(&pool, &fast_retries(), &parts, &body)
            .await
            .unwrap_err();

        // The sole backend failed, was marked dead, and reselection found
        // nothing alive.
        assert_eq!(err, DispatchError::NoBackendAlive);
        assert!(!pool.backends()[0].is_alive());
    }

    #[tokio::test]
    async fn attempts_ceiling_terminates_before_trying_every_backend() {
        let pool = pool_for(refused_addresses(6).await);
        let (parts, body) = request_parts();

        let err = dispatch(&pool, &fast_retries(), &parts, &body)
            .await
            .unwrap_err();

        assert_eq!(err, DispatchError::AttemptsExceeded);
        // Attempts 0..=3 consume four backends; the ceiling check fires
        // before a fifth selection.
        let dead = pool.backends().iter().filter(|b| !b.is_alive()).count();
        assert_eq!(dead, 4);
    }
}
