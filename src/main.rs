//! Server entry point: loads configuration, seeds the catalog and serves the cart API.

use cart_orders_rust::cart::memory::{demo_catalog, InMemoryCartService};
use cart_orders_rust::cart::AppState;
use cart_orders_rust::config::AppConfig;
use cart_orders_rust::router::create_app_router;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // RUST_LOG overrides the default level
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = AppConfig::from_env()?;

    // Initialize application state
    let service = if config.seed_catalog {
        InMemoryCartService::with_catalog(demo_catalog())
    } else {
        InMemoryCartService::new()
    };
    let state = Arc::new(AppState::new(
        Arc::new(service),
        config.identity_header.clone(),
    ));

    // Build application router with all routes and middleware
    let app = create_app_router(state);

    // Start the server
    let listener =
        tokio::net::TcpListener::bind((config.server_host.as_str(), config.server_port)).await?;
    let addr = listener.local_addr()?;
    tracing::info!(%addr, identity_header = %config.identity_header, "server running");
    axum::serve(listener, app).await?;

    Ok(())
}
