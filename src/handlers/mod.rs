/// HTTP request handlers
use crate::domain::Health;
use crate::errors::ApiError;
use crate::services::{
    CatalogFilter, CatalogFilterOptions, CatalogService, LaunchFilter, LaunchFilterOptions,
    RefreshReport, StatsService, SummaryView, SyncService,
};
use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub sync_service: Arc<SyncService>,
    pub stats_service: Arc<StatsService>,
    pub catalog_service: Arc<CatalogService>,
}

/// Successful response wrapper
#[derive(Serialize)]
pub struct SuccessResponse<T: Serialize> {
    pub ok: bool,
    #[serde(flatten)]
    pub data: T,
}

impl<T: Serialize> SuccessResponse<T> {
    pub fn new(data: T) -> Self {
        Self { ok: true, data }
    }
}

/// Health check handler
pub async fn health() -> Json<Health> {
    Json(Health {
        status: "ok",
        now: Utc::now(),
    })
}

/// Get the dashboard summary
pub async fn get_summary(
    State(state): State<AppState>,
) -> Result<Json<SuccessResponse<SummaryView>>, ApiError> {
    let summary = state.stats_service.summary()?;
    Ok(Json(SuccessResponse::new(summary)))
}

/// Get one statistics breakdown by kind
pub async fn get_stats_breakdown(
    Path(kind): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<Value>, ApiError> {
    let data = state.stats_service.breakdown(&kind)?;
    Ok(Json(serde_json::json!(SuccessResponse::new(data))))
}

/// List launches matching the query filters
pub async fn list_launches(
    Query(filter): Query<LaunchFilter>,
    State(state): State<AppState>,
) -> Result<Json<Value>, ApiError> {
    let launches = state.stats_service.launches(&filter)?;
    Ok(Json(serde_json::json!(SuccessResponse::new(
        serde_json::json!({
            "count": launches.len(),
            "launches": launches
        })
    ))))
}

#[derive(Deserialize)]
pub struct RecentQuery {
    limit: Option<usize>,
}

/// List the most recent launches
pub async fn recent_launches(
    Query(params): Query<RecentQuery>,
    State(state): State<AppState>,
) -> Result<Json<Value>, ApiError> {
    let limit = params.limit.unwrap_or(5);
    if limit == 0 {
        return Err(ApiError::InvalidInput(
            "limit must be at least 1".to_string(),
        ));
    }

    let launches = state.stats_service.recent(limit)?;
    Ok(Json(serde_json::json!(SuccessResponse::new(
        serde_json::json!({
            "launches": launches
        })
    ))))
}

/// Get distinct launch filter values
pub async fn launch_filter_options(
    State(state): State<AppState>,
) -> Result<Json<SuccessResponse<LaunchFilterOptions>>, ApiError> {
    let options = state.stats_service.filter_options()?;
    Ok(Json(SuccessResponse::new(options)))
}

/// List catalog satellites matching the query filters
pub async fn list_satellites(
    Query(filter): Query<CatalogFilter>,
    State(state): State<AppState>,
) -> Result<Json<Value>, ApiError> {
    let satellites = state.catalog_service.satellites(&filter)?;
    Ok(Json(serde_json::json!(SuccessResponse::new(
        serde_json::json!({
            "count": satellites.len(),
            "satellites": satellites
        })
    ))))
}

/// Get distinct catalog filter values
pub async fn satellite_filter_options(
    State(state): State<AppState>,
) -> Result<Json<SuccessResponse<CatalogFilterOptions>>, ApiError> {
    let options = state.catalog_service.filter_options()?;
    Ok(Json(SuccessResponse::new(options)))
}

/// Get satellite counts per mission type
pub async fn mission_type_distribution(
    State(state): State<AppState>,
) -> Result<Json<Value>, ApiError> {
    let missions = state.catalog_service.mission_types()?;
    Ok(Json(serde_json::json!(SuccessResponse::new(
        serde_json::json!({
            "missions": missions
        })
    ))))
}

/// Re-fetch both documents and rebuild the snapshot
pub async fn refresh_data(
    State(state): State<AppState>,
) -> Result<Json<SuccessResponse<RefreshReport>>, ApiError> {
    let report = state.sync_service.refresh().await?;
    Ok(Json(SuccessResponse::new(report)))
}
