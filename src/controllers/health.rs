use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::store::Store;
use crate::AppState;

// GET /
pub async fn index<S: Store>(State(state): State<Arc<AppState<S>>>) -> Json<Value> {
    Json(json!({
        "service": "Events API",
        "version": env!("CARGO_PKG_VERSION"),
        "store": state.config.app.store.as_str(),
    }))
}

// GET /health
pub async fn health_check<S: Store>(
    State(state): State<Arc<AppState<S>>>,
) -> (StatusCode, Json<Value>) {
    match state.store.check_health().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({ "status": "ok", "database": "up" })),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "degraded", "database": "down" })),
            )
        }
    }
}
