//! Хранилище событий и броней.
//!
//! Трейты описывают и чтение (для внешнего слоя отображения), и запись
//! уже провалидированных записей. Ограничения уникальности обязаны
//! соблюдаться самим хранилищем, а не только проверками в сервисах.

pub mod memory;
pub mod postgres;

use std::future::Future;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{Booking, Event};

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    /// Нарушен уникальный индекс; `constraint` - его имя.
    #[error("unique constraint violated: {constraint}")]
    UniqueViolation { constraint: String },

    #[error("foreign key constraint violated: {constraint}")]
    ForeignKeyViolation { constraint: String },

    /// Хранилище недоступно: нет подключения, таймаут пула и т.п.
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    #[error("storage error: {0}")]
    Other(String),
}

pub const EVENTS_SLUG_KEY: &str = "events_slug_key";
pub const BOOKINGS_EVENT_EMAIL_KEY: &str = "bookings_event_id_email_key";
pub const BOOKINGS_EVENT_FKEY: &str = "bookings_event_id_fkey";

pub trait EventRepository: Send + Sync {
    fn insert_event(&self, event: Event) -> impl Future<Output = Result<Event, StoreError>> + Send;

    /// Заменить запись целиком одной операцией. `None`, если записи нет.
    fn replace_event(
        &self,
        event: Event,
    ) -> impl Future<Output = Result<Option<Event>, StoreError>> + Send;

    fn find_event_by_id(
        &self,
        id: Uuid,
    ) -> impl Future<Output = Result<Option<Event>, StoreError>> + Send;

    fn find_event_by_slug(
        &self,
        slug: &str,
    ) -> impl Future<Output = Result<Option<Event>, StoreError>> + Send;

    /// Все события, новые первыми.
    fn list_events(&self) -> impl Future<Output = Result<Vec<Event>, StoreError>> + Send;
}

pub trait BookingRepository: Send + Sync {
    /// Вставка брони. Повтор пары (event_id, email) - `UniqueViolation`,
    /// несуществующее событие - `ForeignKeyViolation`.
    fn insert_booking(
        &self,
        booking: Booking,
    ) -> impl Future<Output = Result<Booking, StoreError>> + Send;

    fn booking_exists(
        &self,
        event_id: Uuid,
        email: &str,
    ) -> impl Future<Output = Result<bool, StoreError>> + Send;

    /// Брони события, новые первыми.
    fn list_bookings_for_event(
        &self,
        event_id: Uuid,
    ) -> impl Future<Output = Result<Vec<Booking>, StoreError>> + Send;
}

pub trait HealthCheck: Send + Sync {
    fn check_health(&self) -> impl Future<Output = Result<(), StoreError>> + Send;
}

/// Все, что нужно сервисам и HTTP-слою от хранилища.
pub trait Store: EventRepository + BookingRepository + HealthCheck + Clone + 'static {}

impl<T> Store for T where T: EventRepository + BookingRepository + HealthCheck + Clone + 'static {}
