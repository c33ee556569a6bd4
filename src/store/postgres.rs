use sqlx::{error::ErrorKind, PgPool};
use std::sync::Arc;
use uuid::Uuid;

use super::{BookingRepository, EventRepository, HealthCheck, StoreError};
use crate::database::PgConnectionManager;
use crate::models::{Booking, Event};

const EVENT_COLUMNS: &str = "id, title, slug, description, overview, image, venue, location, \
     date, time, mode, audience, agenda, organizer, tags, created_at, updated_at";

const BOOKING_COLUMNS: &str = "id, event_id, email, created_at, updated_at";

/// Postgres-хранилище. Каждый запрос берет пул через менеджер подключения,
/// так что первый запрос после старта или сброса сам откроет подключение.
#[derive(Clone)]
pub struct PgStore {
    connections: Arc<PgConnectionManager>,
}

impl PgStore {
    pub fn new(connections: Arc<PgConnectionManager>) -> Self {
        Self { connections }
    }

    async fn pool(&self) -> Result<PgPool, StoreError> {
        self.connections
            .get()
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        match &e {
            sqlx::Error::Database(db) => {
                let constraint = db.constraint().unwrap_or_default().to_string();
                match db.kind() {
                    ErrorKind::UniqueViolation => StoreError::UniqueViolation { constraint },
                    ErrorKind::ForeignKeyViolation => {
                        StoreError::ForeignKeyViolation { constraint }
                    }
                    _ => StoreError::Other(e.to_string()),
                }
            }
            sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::WorkerCrashed => StoreError::Unavailable(e.to_string()),
            _ => StoreError::Other(e.to_string()),
        }
    }
}

impl EventRepository for PgStore {
    async fn insert_event(&self, event: Event) -> Result<Event, StoreError> {
        let pool = self.pool().await?;
        let sql = format!(
            "INSERT INTO events (
                id, title, slug, description, overview, image, venue, location,
                date, time, mode, audience, agenda, organizer, tags, created_at, updated_at
             )
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
             RETURNING {EVENT_COLUMNS}"
        );

        let row = sqlx::query_as::<_, Event>(&sql)
            .bind(event.id)
            .bind(&event.title)
            .bind(&event.slug)
            .bind(&event.description)
            .bind(&event.overview)
            .bind(&event.image)
            .bind(&event.venue)
            .bind(&event.location)
            .bind(&event.date)
            .bind(&event.time)
            .bind(event.mode.as_str())
            .bind(&event.audience)
            .bind(&event.agenda)
            .bind(&event.organizer)
            .bind(&event.tags)
            .bind(event.created_at)
            .bind(event.updated_at)
            .fetch_one(&pool)
            .await?;

        Ok(row)
    }

    async fn replace_event(&self, event: Event) -> Result<Option<Event>, StoreError> {
        let pool = self.pool().await?;
        // Одна команда UPDATE: читатели видят либо старую, либо новую запись
        let sql = format!(
            "UPDATE events
             SET title = $2, slug = $3, description = $4, overview = $5, image = $6,
                 venue = $7, location = $8, date = $9, time = $10, mode = $11,
                 audience = $12, agenda = $13, organizer = $14, tags = $15, updated_at = $16
             WHERE id = $1
             RETURNING {EVENT_COLUMNS}"
        );

        let row = sqlx::query_as::<_, Event>(&sql)
            .bind(event.id)
            .bind(&event.title)
            .bind(&event.slug)
            .bind(&event.description)
            .bind(&event.overview)
            .bind(&event.image)
            .bind(&event.venue)
            .bind(&event.location)
            .bind(&event.date)
            .bind(&event.time)
            .bind(event.mode.as_str())
            .bind(&event.audience)
            .bind(&event.agenda)
            .bind(&event.organizer)
            .bind(&event.tags)
            .bind(event.updated_at)
            .fetch_optional(&pool)
            .await?;

        Ok(row)
    }

    async fn find_event_by_id(&self, id: Uuid) -> Result<Option<Event>, StoreError> {
        let pool = self.pool().await?;
        let sql = format!("SELECT {EVENT_COLUMNS} FROM events WHERE id = $1");
        let row = sqlx::query_as::<_, Event>(&sql)
            .bind(id)
            .fetch_optional(&pool)
            .await?;
        Ok(row)
    }

    async fn find_event_by_slug(&self, slug: &str) -> Result<Option<Event>, StoreError> {
        let pool = self.pool().await?;
        let sql = format!("SELECT {EVENT_COLUMNS} FROM events WHERE slug = $1");
        let row = sqlx::query_as::<_, Event>(&sql)
            .bind(slug)
            .fetch_optional(&pool)
            .await?;
        Ok(row)
    }

    async fn list_events(&self) -> Result<Vec<Event>, StoreError> {
        let pool = self.pool().await?;
        let sql = format!("SELECT {EVENT_COLUMNS} FROM events ORDER BY created_at DESC, slug");
        let rows = sqlx::query_as::<_, Event>(&sql).fetch_all(&pool).await?;
        Ok(rows)
    }
}

impl BookingRepository for PgStore {
    async fn insert_booking(&self, booking: Booking) -> Result<Booking, StoreError> {
        let pool = self.pool().await?;
        let sql = format!(
            "INSERT INTO bookings (id, event_id, email, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {BOOKING_COLUMNS}"
        );

        let row = sqlx::query_as::<_, Booking>(&sql)
            .bind(booking.id)
            .bind(booking.event_id)
            .bind(&booking.email)
            .bind(booking.created_at)
            .bind(booking.updated_at)
            .fetch_one(&pool)
            .await?;

        Ok(row)
    }

    async fn booking_exists(&self, event_id: Uuid, email: &str) -> Result<bool, StoreError> {
        let pool = self.pool().await?;
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM bookings WHERE event_id = $1 AND email = $2)",
        )
        .bind(event_id)
        .bind(email)
        .fetch_one(&pool)
        .await?;
        Ok(exists)
    }

    async fn list_bookings_for_event(&self, event_id: Uuid) -> Result<Vec<Booking>, StoreError> {
        let pool = self.pool().await?;
        let sql = format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings WHERE event_id = $1 ORDER BY created_at DESC"
        );
        let rows = sqlx::query_as::<_, Booking>(&sql)
            .bind(event_id)
            .fetch_all(&pool)
            .await?;
        Ok(rows)
    }
}

impl HealthCheck for PgStore {
    async fn check_health(&self) -> Result<(), StoreError> {
        self.connections
            .check_health()
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))
    }
}
