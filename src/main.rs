// Main entry point - Dependency injection and server setup
mod domain;
mod application;
mod infrastructure;
mod presentation;

use std::{net::SocketAddr, sync::Arc};
use anyhow::Context;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::infrastructure::config::load_planner_config;
use crate::infrastructure::http_gateway::HttpRouteGateway;
use crate::presentation::app_state::AppState;
use crate::presentation::routes::router;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tower_http=info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = load_planner_config()?;
    let map_defaults = config.map.defaults()?;

    // Create gateway (infrastructure layer)
    let gateway = Arc::new(HttpRouteGateway::new(
        &config.backend.base_url,
        &config.backend.path,
        config.backend.field_mapping.clone(),
    ));
    tracing::info!(endpoint = gateway.endpoint(), "Route optimizer configured");

    // Create application state
    let state = Arc::new(AppState::new(
        gateway,
        config.backend.charger_preferences.clone(),
        config.map.clone(),
        map_defaults,
    ));

    // Build router (presentation layer)
    let app = router(state).layer(TraceLayer::new_for_http());

    // Start server
    let addr: SocketAddr = config
        .server
        .bind_addr
        .parse()
        .with_context(|| format!("invalid bind address '{}'", config.server.bind_addr))?;
    tracing::info!(%addr, "Starting ev-trip-planner");

    axum::serve(tokio::net::TcpListener::bind(addr).await?, app).await?;

    Ok(())
}
