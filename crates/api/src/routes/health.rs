use axum::{extract::State, routing::get, Json, Router};
use serde_json::{json, Value};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Health check routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/v1/ping", get(ping))
}

/// Full health check. Verifies the content store is reachable.
async fn health_check(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    let repository = state.repository();
    repository
        .ping()
        .await
        .map_err(|e| ApiError::Internal(format!("content store health check failed: {e}")))?;

    Ok(Json(json!({
        "status": "ok",
        "store": repository.kind(),
        "subscribers": state.event_bus().subscriber_count(),
    })))
}

/// Lightweight ping. Does not touch the store.
async fn ping() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
