//! Backend abstraction.
//!
//! # Responsibilities
//! - Represent a single upstream server
//! - Track liveness (alive/dead) under concurrent access
//! - Own the forwarding client bound to the backend address
//! - Probe the upstream health endpoint and update liveness

use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use axum::body::Body;
use axum::http::uri::{Authority, Scheme};
use axum::http::{Request, Response, Uri};
use hyper::body::Incoming;
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use tokio::time;
use url::Url;

/// Error constructing a backend from a configured address.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("unsupported scheme '{0}', expected http or https")]
    UnsupportedScheme(String),
    #[error("address has no host")]
    MissingHost,
    #[error("invalid authority '{0}'")]
    InvalidAuthority(String),
}

/// Error forwarding a request through a backend.
#[derive(Debug, thiserror::Error)]
pub enum ForwardError {
    #[error("failed to rewrite request uri: {0}")]
    Uri(#[from] axum::http::uri::InvalidUriParts),
    #[error("upstream request failed: {0}")]
    Upstream(#[from] hyper_util::client::legacy::Error),
}

/// A single upstream server.
#[derive(Debug)]
pub struct Backend {
    /// The configured address of the backend.
    pub url: Url,
    /// Liveness flag, written by the health monitor and the failover path.
    alive: AtomicBool,
    /// Scheme to apply when rewriting request URIs.
    scheme: Scheme,
    /// Authority to apply when rewriting request URIs.
    authority: Authority,
    /// Forwarding client, bound to this backend for the process lifetime.
    client: Client<HttpConnector, Body>,
}

impl Backend {
    /// Create a new backend for a validated address.
    ///
    /// Backends start alive; the first failed probe or failover marks them
    /// dead.
    pub fn new(url: Url) -> Result<Self, BackendError> {
        let scheme = match url.scheme() {
            "http" => Scheme::HTTP,
            "https" => Scheme::HTTPS,
            other => return Err(BackendError::UnsupportedScheme(other.to_string())),
        };

        let host = url.host_str().ok_or(BackendError::MissingHost)?;
        let authority_str = match url.port() {
            Some(port) => format!("{}:{}", host, port),
            None => host.to_string(),
        };
        let authority = Authority::from_str(&authority_str)
            .map_err(|_| BackendError::InvalidAuthority(authority_str))?;

        let client = Client::builder(TokioExecutor::new()).build(HttpConnector::new());

        Ok(Self {
            url,
            alive: AtomicBool::new(true),
            scheme,
            authority,
            client,
        })
    }

    /// Set the liveness flag.
    pub fn set_alive(&self, alive: bool) {
        self.alive.store(alive, Ordering::Relaxed);
    }

    /// Read the liveness flag.
    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::Relaxed)
    }

    /// Probe the backend's health endpoint and update liveness.
    ///
    /// Any response with a status in [200, 300) counts as alive; any other
    /// status, a transport error, or a probe timeout counts as dead. The
    /// outcome is logged on every probe, not only on transitions.
    pub async fn probe(&self, path: &str, timeout: Duration) -> bool {
        let uri = format!("{}{}", self.url.as_str().trim_end_matches('/'), path);

        let alive = match Request::builder()
            .method("GET")
            .uri(uri)
            .header("user-agent", "http-balancer-health-check")
            .body(Body::empty())
        {
            Ok(request) => match time::timeout(timeout, self.client.request(request)).await {
                Ok(Ok(response)) => response.status().is_success(),
                Ok(Err(error)) => {
                    tracing::debug!(url = %self.url, error = %error, "Health probe transport error");
                    false
                }
                Err(_) => {
                    tracing::debug!(url = %self.url, "Health probe timed out");
                    false
                }
            },
            Err(error) => {
                tracing::error!(url = %self.url, error = %error, "Failed to build health probe request");
                false
            }
        };

        if alive {
            tracing::info!(url = %self.url, "Backend is UP");
        } else {
            tracing::warn!(url = %self.url, "Backend is DOWN");
        }
        self.set_alive(alive);
        alive
    }

    /// Forward a request to this backend.
    ///
    /// The request URI keeps its path and query; scheme and authority are
    /// rewritten to point at this backend.
    pub async fn forward(&self, request: Request<Body>) -> Result<Response<Incoming>, ForwardError> {
        let (mut parts, body) = request.into_parts();

        let mut uri_parts = parts.uri.into_parts();
        uri_parts.scheme = Some(self.scheme.clone());
        uri_parts.authority = Some(self.authority.clone());
        parts.uri = Uri::from_parts(uri_parts)?;

        let request = Request::from_parts(parts, body);
        Ok(self.client.request(request).await?)
    }
}
