//! HTTP load balancer daemon.
//!
//! Spreads inbound traffic across a fixed set of upstream backends with
//! round-robin selection, periodic health checks, and bounded
//! retry/failover.
//!
//! ```text
//! http-balancer --backends http://127.0.0.1:9001,http://127.0.0.1:9002 --port 8080
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;

use http_balancer::config::{load_config, BalancerConfig, ConfigError};
use http_balancer::lifecycle::Shutdown;
use http_balancer::observability::logging;
use http_balancer::HttpServer;

#[derive(Debug, Parser)]
#[command(name = "http-balancer", about = "HTTP load balancer")]
struct Options {
    /// Comma-separated upstream addresses, e.g. "http://h1:9001,http://h2:9002".
    #[arg(long)]
    backends: Option<String>,

    /// Port the load balancer listens on.
    #[arg(long)]
    port: Option<u16>,

    /// Selection algorithm (round-robin).
    #[arg(long)]
    algorithm: Option<String>,

    /// Optional TOML config file; flags override its values.
    #[arg(long)]
    config: Option<PathBuf>,
}

fn build_config(options: &Options) -> Result<BalancerConfig, ConfigError> {
    let mut config = match &options.config {
        Some(path) => load_config(path)?,
        None => BalancerConfig::default(),
    };

    if let Some(backends) = &options.backends {
        config.backends = backends
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
    }
    if let Some(algorithm) = &options.algorithm {
        config.algorithm = algorithm.clone();
    }
    if let Some(port) = options.port {
        config.bind_address = format!("0.0.0.0:{}", port);
    }

    Ok(config)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init("http_balancer=debug,tower_http=info");

    let options = Options::parse();
    let config = build_config(&options)?;

    if config.backends.is_empty() {
        tracing::error!("Please provide one or more backends");
        return Err("no backends configured".into());
    }

    tracing::info!(
        bind_address = %config.bind_address,
        backends = config.backends.len(),
        algorithm = %config.algorithm,
        "Configuration loaded"
    );

    let listener = TcpListener::bind(&config.bind_address).await?;

    let shutdown = Arc::new(Shutdown::new());
    let signal_shutdown = shutdown.clone();
    tokio::spawn(async move {
        signal_shutdown.trigger_on_ctrl_c().await;
    });

    let server = HttpServer::new(config);
    server.run(listener, &shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_defaults() {
        let options = Options {
            backends: Some("http://127.0.0.1:9001, http://127.0.0.1:9002".to_string()),
            port: Some(9999),
            algorithm: Some("round-robin".to_string()),
            config: None,
        };

        let config = build_config(&options).unwrap();
        assert_eq!(config.backends.len(), 2);
        assert_eq!(config.backends[1], "http://127.0.0.1:9002");
        assert_eq!(config.bind_address, "0.0.0.0:9999");
    }

    #[test]
    fn missing_flags_keep_defaults() {
        let options = Options {
            backends: None,
            port: None,
            algorithm: None,
            config: None,
        };

        let config = build_config(&options).unwrap();
        assert!(config.backends.is_empty());
        assert_eq!(config.bind_address, "0.0.0.0:8080");
    }
}
