//! Demo upstream service for manual testing.
//!
//! Serves the two endpoints the balancer's contract expects: `GET /ping`
//! (regular traffic) and `GET /healthcheck` (liveness probe). Run several
//! on different ports and point `http-balancer --backends` at them.

use axum::{http::HeaderMap, routing::get, Router};
use clap::Parser;
use tokio::net::TcpListener;

use http_balancer::observability::logging;

#[derive(Debug, Parser)]
#[command(name = "demo-backend", about = "Demo upstream for the load balancer")]
struct Options {
    /// Port the backend listens on.
    #[arg(long, default_value_t = 9001)]
    port: u16,
}

fn host_of(headers: &HeaderMap) -> &str {
    headers
        .get("host")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
}

async fn ping(headers: HeaderMap) -> String {
    let message = format!("Pong on {}", host_of(&headers));
    tracing::info!("{}", message);
    message
}

async fn healthcheck(headers: HeaderMap) -> String {
    let message = format!("The service is running on {}", host_of(&headers));
    tracing::info!("{}", message);
    message
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init("demo_backend=info");

    let options = Options::parse();
    let app = Router::new()
        .route("/ping", get(ping))
        .route("/healthcheck", get(healthcheck));

    let listener = TcpListener::bind(("0.0.0.0", options.port)).await?;
    tracing::info!(port = options.port, "Backend started");

    axum::serve(listener, app).await?;
    Ok(())
}
