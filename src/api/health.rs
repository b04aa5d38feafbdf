use crate::api::AppState;
use crate::api::schemas::health::HealthResponse;
use axum::{Json, extract::State};

/// Liveness check: reports the configured table and region without touching storage.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse::from(state.health_service.identity()))
}
