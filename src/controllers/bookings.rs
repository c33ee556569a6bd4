use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;

use crate::error::AppError;
use crate::models::BookingPayload;
use crate::{store::Store, AppState};

pub fn routes<S: Store>() -> Router<Arc<AppState<S>>> {
    Router::new()
        .route("/bookings", post(create_booking::<S>))
        .route("/events/{slug}/bookings", get(list_event_bookings::<S>))
}

// POST /api/bookings
async fn create_booking<S: Store>(
    State(state): State<Arc<AppState<S>>>,
    Json(req): Json<BookingPayload>,
) -> Result<impl IntoResponse, AppError> {
    let booking = state
        .bookings
        .create_booking(req.event_id, &req.email)
        .await?;
    tracing::info!(booking_id = %booking.id, event_id = %booking.event_id, "booking created");
    Ok((StatusCode::CREATED, Json(booking)))
}

// GET /api/events/{slug}/bookings
async fn list_event_bookings<S: Store>(
    State(state): State<Arc<AppState<S>>>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let bookings = state.bookings.list_bookings_for_event(&slug).await?;
    Ok(Json(bookings))
}
