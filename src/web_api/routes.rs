//! API Routes

use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::Deserialize;

use crate::error::Result;
use crate::models::ApiResponse;
use crate::space_inventory::SpaceStatus;
use crate::state::AppState;

/// Create API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/healthz", get(super::health_check))
        // Gate operations
        .route("/api/entry", post(vehicle_entry))
        .route("/api/exit", post(vehicle_exit))
        // Whitelist
        .route("/api/whitelist", get(list_whitelist))
        .route("/api/whitelist", post(add_whitelist))
        .route("/api/whitelist/:plate", delete(remove_whitelist))
        // Spaces
        .route("/api/spaces", get(list_spaces))
        .route("/api/spaces/:code/reservation", put(set_reservation))
        // Views
        .route("/api/vehicles", get(list_vehicles))
        .route("/api/events", get(list_events))
        .route("/api/summary", get(lot_summary))
        .with_state(state)
}

// ========================================
// Gate Handlers
// ========================================

#[derive(Debug, Deserialize)]
struct PlateRequest {
    plate: String,
}

async fn vehicle_entry(
    State(state): State<AppState>,
    Json(req): Json<PlateRequest>,
) -> Result<impl IntoResponse> {
    let receipt = state.engine.entry(&req.plate).await?;
    Ok(Json(ApiResponse::success(receipt)))
}

async fn vehicle_exit(
    State(state): State<AppState>,
    Json(req): Json<PlateRequest>,
) -> Result<impl IntoResponse> {
    let receipt = state.engine.exit(&req.plate).await?;
    Ok(Json(ApiResponse::success(receipt)))
}

// ========================================
// Whitelist Handlers
// ========================================

#[derive(Debug, Deserialize)]
struct AddWhitelistRequest {
    plate: String,
    #[serde(default)]
    notes: String,
}

async fn list_whitelist(State(state): State<AppState>) -> impl IntoResponse {
    let entries = state.whitelist.list().await;
    Json(ApiResponse::success(entries))
}

async fn add_whitelist(
    State(state): State<AppState>,
    Json(req): Json<AddWhitelistRequest>,
) -> Result<impl IntoResponse> {
    let plate = req.plate.trim();
    if plate.is_empty() {
        return Err(crate::Error::Validation(
            "plate must not be empty".to_string(),
        ));
    }
    let entry = state.whitelist.add(plate, &req.notes).await?;
    Ok(Json(ApiResponse::success(entry)))
}

async fn remove_whitelist(
    State(state): State<AppState>,
    Path(plate): Path<String>,
) -> impl IntoResponse {
    state.whitelist.remove(plate.trim()).await;
    Json(ApiResponse::success(()))
}

// ========================================
// Space Handlers
// ========================================

#[derive(Debug, Deserialize)]
struct ReservationRequest {
    status: SpaceStatus,
}

async fn list_spaces(State(state): State<AppState>) -> impl IntoResponse {
    let spaces = state.engine.spaces().await;
    Json(ApiResponse::success(spaces))
}

async fn set_reservation(
    State(state): State<AppState>,
    Path(code): Path<String>,
    Json(req): Json<ReservationRequest>,
) -> Result<impl IntoResponse> {
    state.engine.set_reservation(&code, req.status).await?;
    Ok(Json(ApiResponse::success(())))
}

// ========================================
// View Handlers
// ========================================

#[derive(Debug, Deserialize)]
struct EventsQuery {
    limit: Option<usize>,
}

async fn list_vehicles(State(state): State<AppState>) -> impl IntoResponse {
    let vehicles = state.engine.active_vehicles().await;
    Json(ApiResponse::success(vehicles))
}

async fn list_events(
    State(state): State<AppState>,
    Query(query): Query<EventsQuery>,
) -> impl IntoResponse {
    let events = state.event_log.recent(query.limit.unwrap_or(50)).await;
    Json(ApiResponse::success(events))
}

async fn lot_summary(State(state): State<AppState>) -> impl IntoResponse {
    let summary = state.engine.summary().await;
    Json(ApiResponse::success(summary))
}
