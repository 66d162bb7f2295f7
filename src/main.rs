/// Main application entry point with clean architecture
mod clients;
mod config;
mod domain;
mod errors;
mod handlers;
mod routes;
mod services;
mod stats;
mod store;
mod utils;

use crate::clients::{LaunchArchiveClient, SatelliteCatalogClient};
use crate::config::AppConfig;
use crate::handlers::AppState;
use crate::routes::build_router;
use crate::services::{CatalogService, StatsService, SyncService};
use crate::store::SnapshotStore;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);

    // Load configuration
    let config = AppConfig::from_env()?;
    info!("Configuration loaded successfully");

    // Initialize the snapshot store
    let store = SnapshotStore::new();

    // Initialize clients
    let launch_client = LaunchArchiveClient::new(config.launch_data_url.clone())?;
    let catalog_client = SatelliteCatalogClient::new(config.satellite_data_url.clone())?;

    // Initialize services
    let sync_service = Arc::new(SyncService::new(launch_client, catalog_client, store.clone()));
    let stats_service = Arc::new(StatsService::new(store.clone()));
    let catalog_service = Arc::new(CatalogService::new(store));

    // Initial load. On failure the store stays empty and every data route
    // reports DATA_UNAVAILABLE until a /refresh succeeds.
    match sync_service.refresh().await {
        Ok(report) => info!(
            "Initial load complete: {} launches, {} catalog satellites, {} skipped",
            report.launches, report.satellites, report.skipped_records
        ),
        Err(e) => error!("Initial load failed: {e}; serving without data"),
    }

    // Initialize application state
    let state = AppState {
        sync_service,
        stats_service,
        catalog_service,
    };

    // Build router
    let app = build_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!("launchboard service listening on {}", config.bind_addr);

    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}
