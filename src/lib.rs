pub mod config;
pub mod connection;
pub mod controllers;
pub mod database;
pub mod error;
pub mod models;
pub mod services;
pub mod store;
pub mod validation;

use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use services::{BookingService, EventService};
use store::Store;

// Shared state для всего приложения
pub struct AppState<S> {
    pub config: config::Config,
    pub store: S,
    pub events: EventService<S>,
    pub bookings: BookingService<S>,
}

impl<S: Store> AppState<S> {
    pub fn new(config: config::Config, store: S) -> Arc<Self> {
        Arc::new(Self {
            config,
            events: EventService::new(store.clone()),
            bookings: BookingService::new(store.clone()),
            store,
        })
    }
}

/// Полный роутер приложения: API под `/api` и служебные маршруты.
pub fn app<S: Store>(state: Arc<AppState<S>>) -> Router {
    Router::new()
        .route("/", get(controllers::health::index::<S>))
        .route("/health", get(controllers::health::health_check::<S>))
        .nest("/api", controllers::routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
