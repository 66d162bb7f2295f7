/// Application routes configuration
use crate::handlers::{
    get_stats_breakdown, get_summary, health, launch_filter_options, list_launches,
    list_satellites, mission_type_distribution, recent_launches, refresh_data,
    satellite_filter_options, AppState,
};
use axum::{routing::get, Router};

/// Build the application router with all routes
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health))
        // Snapshot refresh
        .route("/refresh", get(refresh_data))
        // Statistics endpoints
        .route("/stats/summary", get(get_summary))
        .route("/stats/:kind", get(get_stats_breakdown))
        // Launch archive endpoints
        .route("/launches", get(list_launches))
        .route("/launches/recent", get(recent_launches))
        .route("/launches/filters", get(launch_filter_options))
        // Satellite catalog endpoints
        .route("/satellites", get(list_satellites))
        .route("/satellites/filters", get(satellite_filter_options))
        .route("/satellites/missions", get(mission_type_distribution))
        .with_state(state)
}
