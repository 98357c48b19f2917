//! HTTP server setup and the pool-aware request handler.
//!
//! # Responsibilities
//! - Build the Axum router: every path, every method → balance handler
//! - Wire up tracing middleware and request ids
//! - Spawn the health monitor next to the server
//! - Serve until the shutdown signal fires

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{header::HeaderValue, Request, StatusCode},
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::config::{BalancerConfig, RetryConfig};
use crate::health::active::HealthMonitor;
use crate::lifecycle::Shutdown;
use crate::load_balancer::pool::BackendPool;
use crate::resilience::{dispatch, DispatchError};

/// Largest request body buffered for retry replay.
const MAX_BUFFERED_BODY: usize = 1024 * 1024;

/// Application state injected into the handler.
#[derive(Clone)]
pub struct AppState {
    pub pool: Arc<BackendPool>,
    pub retry_config: RetryConfig,
}

/// HTTP server for the load balancer.
pub struct HttpServer {
    router: Router,
    config: BalancerConfig,
    pool: Arc<BackendPool>,
}

impl HttpServer {
    /// Create a new server with the given configuration.
    pub fn new(config: BalancerConfig) -> Self {
        let pool = Arc::new(BackendPool::from_config(&config));

        let state = AppState {
            pool: pool.clone(),
            retry_config: config.retries.clone(),
        };

        let router = Router::new()
            .route("/{*path}", any(balance))
            .route("/", any(balance))
            .with_state(state)
            .layer(TraceLayer::new_for_http());

        Self {
            router,
            config,
            pool,
        }
    }

    /// The backend pool this server balances over.
    pub fn pool(&self) -> Arc<BackendPool> {
        self.pool.clone()
    }

    /// Run the server, accepting connections on the given listener.
    ///
    /// The health monitor runs as a sibling background task and observes
    /// the same shutdown signal.
    pub async fn run(self, listener: TcpListener, shutdown: &Shutdown) -> std::io::Result<()> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, backends = self.pool.len(), "Load balancer started");

        let monitor = HealthMonitor::new(self.pool.clone(), self.config.health_check.clone());
        let monitor_shutdown = shutdown.subscribe();
        tokio::spawn(async move {
            monitor.run(monitor_shutdown).await;
        });

        let mut serve_shutdown = shutdown.subscribe();
        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = serve_shutdown.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// The single request entry point: every inbound request flows through the
/// pool, the strategy, and the retry/failover protocol.
async fn balance(State(state): State<AppState>, request: Request<Body>) -> impl IntoResponse {
    let (mut parts, body) = request.into_parts();

    // Propagate an existing request id or mint one.
    let request_id = match parts
        .headers
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
    {
        Some(id) => id.to_string(),
        None => {
            let id = Uuid::new_v4().to_string();
            if let Ok(value) = HeaderValue::from_str(&id) {
                parts.headers.insert("x-request-id", value);
            }
            id
        }
    };

    tracing::debug!(
        request_id = %request_id,
        method = %parts.method,
        path = %parts.uri.path(),
        "Balancing request"
    );

    // Buffer the body so retries can replay it.
    let body_bytes = match axum::body::to_bytes(body, MAX_BUFFERED_BODY).await {
        Ok(bytes) => bytes,
        Err(error) => {
            tracing::warn!(request_id = %request_id, error = %error, "Request body too large to buffer");
            return (StatusCode::PAYLOAD_TOO_LARGE, "Request body too large").into_response();
        }
    };

    match dispatch(&state.pool, &state.retry_config, &parts, &body_bytes).await {
        Ok(response) => {
            let (parts, body) = response.into_parts();
            Response::from_parts(parts, Body::new(body)).into_response()
        }
        Err(error @ (DispatchError::NoBackendAlive | DispatchError::AttemptsExceeded)) => {
            tracing::warn!(request_id = %request_id, error = %error, "Request terminally failed");
            (StatusCode::SERVICE_UNAVAILABLE, "Service not available").into_response()
        }
    }
}
