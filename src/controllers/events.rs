use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use std::sync::Arc;

use crate::error::AppError;
use crate::models::EventPayload;
use crate::{store::Store, AppState};

pub fn routes<S: Store>() -> Router<Arc<AppState<S>>> {
    Router::new()
        .route("/events", get(list_events::<S>).post(create_event::<S>))
        .route(
            "/events/{slug}",
            get(get_event::<S>).patch(update_event::<S>),
        )
}

// POST /api/events
async fn create_event<S: Store>(
    State(state): State<Arc<AppState<S>>>,
    Json(payload): Json<EventPayload>,
) -> Result<impl IntoResponse, AppError> {
    let event = state.events.create_event(payload).await?;
    tracing::info!(slug = %event.slug, "event created");
    Ok((StatusCode::CREATED, Json(event)))
}

// GET /api/events
async fn list_events<S: Store>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<impl IntoResponse, AppError> {
    let events = state.events.list_events().await?;
    Ok(Json(events))
}

// GET /api/events/{slug}
async fn get_event<S: Store>(
    State(state): State<Arc<AppState<S>>>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let event = state.events.get_event_by_slug(&slug).await?;
    Ok(Json(event))
}

// PATCH /api/events/{slug}
async fn update_event<S: Store>(
    State(state): State<Arc<AppState<S>>>,
    Path(slug): Path<String>,
    Json(patch): Json<EventPayload>,
) -> Result<impl IntoResponse, AppError> {
    let event = state.events.update_event(&slug, patch).await?;
    Ok(Json(event))
}
