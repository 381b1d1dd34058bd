//! LifeTrack HTTP/JSON Gateway binary.

use std::sync::Arc;

use clap::Parser;
use lifetrack_core::{LifeTrack, Store};
use lifetrack_gateway::{create_router, AppState, Args, GatewayConfig};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lifetrack_gateway=info,lifetrack_core=info".into()),
        )
        .init();

    // Parse command line args
    let args = Args::parse();
    let config = GatewayConfig::from(&args);

    info!(
        listen = %config.listen_addr,
        data_dir = %config.data_dir.display(),
        "Starting LifeTrack Gateway"
    );

    let store = Arc::new(Store::open(&config.storage())?);
    let service = LifeTrack::new(store.clone()).with_config(config.service.clone());

    for admin in &config.admins {
        service.ensure_admin(admin)?;
    }
    if config.admins.is_empty() {
        warn!("no administrators configured; moderation is unavailable until one is added");
    }

    // Create application state
    let state = AppState::new(service);

    // Create router
    let app = create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.listen_addr).await?;
    info!("Gateway listening on {}", config.listen_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    store.flush()?;
    info!("Gateway stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "failed to listen for shutdown signal");
    }
}
