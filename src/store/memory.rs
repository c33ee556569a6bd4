use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use uuid::Uuid;

use super::{
    BookingRepository, EventRepository, HealthCheck, StoreError, BOOKINGS_EVENT_EMAIL_KEY,
    BOOKINGS_EVENT_FKEY, EVENTS_SLUG_KEY,
};
use crate::models::{Booking, Event};

/// Хранилище в памяти процесса.
///
/// Те же ограничения, что и в Postgres: уникальный slug, уникальная пара
/// (event_id, email), ссылка брони на существующее событие. Проверка и
/// вставка выполняются под одной блокировкой, поэтому гонка двух вставок
/// разрешается так же, как уникальным индексом.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Inner>>,
    unavailable: Arc<AtomicBool>,
}

#[derive(Debug, Default)]
struct Inner {
    events: HashMap<Uuid, Event>,
    bookings: Vec<Booking>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Имитировать недоступность хранилища: все операции вернут `Unavailable`.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>, StoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("memory store is offline".to_string()));
        }
        self.inner
            .lock()
            .map_err(|_| StoreError::Other("memory store lock poisoned".to_string()))
    }
}

fn slug_taken(inner: &Inner, slug: &str, except: Uuid) -> bool {
    inner
        .events
        .values()
        .any(|e| e.slug == slug && e.id != except)
}

impl EventRepository for MemoryStore {
    async fn insert_event(&self, event: Event) -> Result<Event, StoreError> {
        let mut inner = self.lock()?;
        if inner.events.contains_key(&event.id) {
            return Err(StoreError::UniqueViolation {
                constraint: "events_pkey".to_string(),
            });
        }
        if slug_taken(&inner, &event.slug, event.id) {
            return Err(StoreError::UniqueViolation {
                constraint: EVENTS_SLUG_KEY.to_string(),
            });
        }
        inner.events.insert(event.id, event.clone());
        Ok(event)
    }

    async fn replace_event(&self, event: Event) -> Result<Option<Event>, StoreError> {
        let mut inner = self.lock()?;
        if !inner.events.contains_key(&event.id) {
            return Ok(None);
        }
        if slug_taken(&inner, &event.slug, event.id) {
            return Err(StoreError::UniqueViolation {
                constraint: EVENTS_SLUG_KEY.to_string(),
            });
        }
        inner.events.insert(event.id, event.clone());
        Ok(Some(event))
    }

    async fn find_event_by_id(&self, id: Uuid) -> Result<Option<Event>, StoreError> {
        Ok(self.lock()?.events.get(&id).cloned())
    }

    async fn find_event_by_slug(&self, slug: &str) -> Result<Option<Event>, StoreError> {
        Ok(self
            .lock()?
            .events
            .values()
            .find(|e| e.slug == slug)
            .cloned())
    }

    async fn list_events(&self) -> Result<Vec<Event>, StoreError> {
        let mut events: Vec<Event> = self.lock()?.events.values().cloned().collect();
        events.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.slug.cmp(&b.slug)));
        Ok(events)
    }
}

impl BookingRepository for MemoryStore {
    async fn insert_booking(&self, booking: Booking) -> Result<Booking, StoreError> {
        let mut inner = self.lock()?;
        if !inner.events.contains_key(&booking.event_id) {
            return Err(StoreError::ForeignKeyViolation {
                constraint: BOOKINGS_EVENT_FKEY.to_string(),
            });
        }
        let duplicate = inner
            .bookings
            .iter()
            .any(|b| b.event_id == booking.event_id && b.email == booking.email);
        if duplicate {
            return Err(StoreError::UniqueViolation {
                constraint: BOOKINGS_EVENT_EMAIL_KEY.to_string(),
            });
        }
        inner.bookings.push(booking.clone());
        Ok(booking)
    }

    async fn booking_exists(&self, event_id: Uuid, email: &str) -> Result<bool, StoreError> {
        Ok(self
            .lock()?
            .bookings
            .iter()
            .any(|b| b.event_id == event_id && b.email == email))
    }

    async fn list_bookings_for_event(&self, event_id: Uuid) -> Result<Vec<Booking>, StoreError> {
        let mut bookings: Vec<Booking> = self
            .lock()?
            .bookings
            .iter()
            .filter(|b| b.event_id == event_id)
            .cloned()
            .collect();
        bookings.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(bookings)
    }
}

impl HealthCheck for MemoryStore {
    async fn check_health(&self) -> Result<(), StoreError> {
        self.lock().map(|_| ())
    }
}
