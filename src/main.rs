//! courier-gateway server entry point.
//!
//! Builds the handler registry, then starts the Axum HTTP server with the
//! WebSocket endpoint and diagnostics routes.

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use courier_gateway::config::{GatewayConfig, LogFormat};
use courier_gateway::server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = GatewayConfig::from_env().context("invalid LISTEN_ADDR")?;

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match config.log_format {
        LogFormat::Text => tracing_subscriber::fmt().with_env_filter(filter).init(),
        LogFormat::Json => tracing_subscriber::fmt().json().with_env_filter(filter).init(),
    }
    tracing::info!(addr = %config.listen_addr, topic = %config.default_topic, "starting courier-gateway");

    // Register handlers before any connection is accepted
    let registry = server::build_registry().context("registering message handlers")?;
    tracing::info!(types = ?registry.list(), "message handlers registered");

    let state = server::build_state(&config, registry);

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("binding {}", config.listen_addr))?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    server::serve(listener, state).await?;

    Ok(())
}
