pub mod bookings;
pub mod events;
pub mod health;

use axum::Router;
use std::sync::Arc;

use crate::{store::Store, AppState};

pub fn routes<S: Store>() -> Router<Arc<AppState<S>>> {
    Router::new()
        .merge(events::routes())
        .merge(bookings::routes())
}
