//! Health check handler.

use axum::Json;
use axum::extract::State;

use crate::dto::response::HealthResponse;
use crate::state::AppState;

/// GET /api/health
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let store_healthy = state.store.health_check().await.unwrap_or(false);
    let storage_healthy = state.storage.health_check().await.unwrap_or(false);

    let status = if store_healthy && storage_healthy {
        "ok"
    } else {
        "degraded"
    };

    Json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        store: state.store.backend().to_string(),
        store_healthy,
        storage: state.storage.provider_type().to_string(),
        storage_healthy,
    })
}
