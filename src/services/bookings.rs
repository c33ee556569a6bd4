use chrono::Utc;
use tracing::debug;
use uuid::Uuid;

use super::read_error;
use crate::error::{AppError, AppResult};
use crate::models::{Booking, BookingPayload, NewBooking};
use crate::store::{BookingRepository, EventRepository, StoreError};
use crate::validation::{booking::ensure_canonical, validate_booking};

#[derive(Clone)]
pub struct BookingService<R> {
    repo: R,
}

impl<R: EventRepository + BookingRepository> BookingService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Сначала дешевая локальная проверка email, потом запросы к хранилищу.
    pub async fn create_booking(&self, event_id: Uuid, email: &str) -> AppResult<Booking> {
        let booking = validate_booking(BookingPayload {
            event_id,
            email: email.to_string(),
        })?;
        self.commit_booking(booking).await
    }

    /// Записать провалидированную бронь.
    ///
    /// Существование события проверяется при каждой записи. Проверка
    /// дубликата здесь только отсекает очевидные повторы; гонку двух
    /// одновременных записей решает уникальный индекс хранилища.
    pub async fn commit_booking(&self, booking: NewBooking) -> AppResult<Booking> {
        ensure_canonical(&booking)?;
        self.ensure_event_exists(booking.event_id).await?;

        match self.repo.booking_exists(booking.event_id, &booking.email).await {
            Ok(true) => return Err(duplicate()),
            Ok(false) => {}
            Err(e) => return Err(read_error(e)),
        }

        let booking = booking.into_booking(Uuid::new_v4(), Utc::now());
        self.repo
            .insert_booking(booking)
            .await
            .map_err(|e| match e {
                StoreError::UniqueViolation { .. } => duplicate(),
                StoreError::ForeignKeyViolation { .. } => missing_event(),
                other => read_error(other),
            })
    }

    pub async fn list_bookings_for_event(&self, slug: &str) -> AppResult<Vec<Booking>> {
        let event = self
            .repo
            .find_event_by_slug(slug)
            .await
            .map_err(read_error)?
            .ok_or_else(|| AppError::NotFound(format!("event '{slug}' not found")))?;

        self.repo
            .list_bookings_for_event(event.id)
            .await
            .map_err(read_error)
    }

    async fn ensure_event_exists(&self, event_id: Uuid) -> AppResult<()> {
        match self.repo.find_event_by_id(event_id).await {
            Ok(Some(_)) => Ok(()),
            Ok(None) => Err(missing_event()),
            // "Не смогли проверить" - это не "события нет"
            Err(e) => {
                debug!(%event_id, error = %e, "event reference lookup failed");
                Err(AppError::Dependency("validation unavailable".to_string()))
            }
        }
    }
}

fn duplicate() -> AppError {
    AppError::Conflict("duplicate booking".to_string())
}

fn missing_event() -> AppError {
    AppError::Reference("event does not exist".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::EventService;
    use crate::store::MemoryStore;
    use crate::models::EventPayload;

    async fn seeded() -> (MemoryStore, Uuid) {
        let store = MemoryStore::new();
        let event = EventService::new(store.clone())
            .create_event(EventPayload {
                title: Some("Booking Night".to_string()),
                description: Some("d".to_string()),
                overview: Some("o".to_string()),
                image: Some("i".to_string()),
                venue: Some("v".to_string()),
                location: Some("l".to_string()),
                date: Some("2025-06-01".to_string()),
                time: Some("18:00".to_string()),
                mode: Some("online".to_string()),
                audience: Some("a".to_string()),
                agenda: Some(vec!["x".to_string()]),
                organizer: Some("o".to_string()),
                tags: Some(vec!["t".to_string()]),
            })
            .await
            .unwrap();
        (store, event.id)
    }

    #[tokio::test]
    async fn unnormalized_email_never_reaches_store() {
        let (store, event_id) = seeded().await;
        let service = BookingService::new(store.clone());

        let bad = NewBooking {
            event_id,
            email: "  NOT AN EMAIL ".to_string(),
        };
        let err = service.commit_booking(bad).await.unwrap_err();

        assert_eq!(err, AppError::Validation("invalid email".to_string()));
        assert!(store.list_bookings_for_event(event_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn mixed_case_email_is_rejected_at_commit() {
        let (store, event_id) = seeded().await;
        let service = BookingService::new(store.clone());

        let bad = NewBooking {
            event_id,
            email: "User@Example.com".to_string(),
        };
        assert!(service.commit_booking(bad).await.is_err());
        assert!(store.list_bookings_for_event(event_id).await.unwrap().is_empty());
    }
}
