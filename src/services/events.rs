use chrono::Utc;
use uuid::Uuid;

use super::read_error;
use crate::error::{AppError, AppResult};
use crate::models::{Event, EventPayload, NewEvent};
use crate::store::{EventRepository, StoreError};
use crate::validation::{event::ensure_canonical, validate_event, validate_event_patch};

#[derive(Clone)]
pub struct EventService<R> {
    repo: R,
}

impl<R: EventRepository> EventService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub async fn create_event(&self, payload: EventPayload) -> AppResult<Event> {
        let event = validate_event(payload)?;
        self.commit_event(event).await
    }

    /// Записать уже провалидированное событие.
    ///
    /// Запись, которая не в каноническом виде, до хранилища не доходит.
    pub async fn commit_event(&self, event: NewEvent) -> AppResult<Event> {
        ensure_canonical(&event)?;
        let event = event.into_event(Uuid::new_v4(), Utc::now());
        self.repo.insert_event(event).await.map_err(write_error)
    }

    pub async fn update_event(&self, slug: &str, patch: EventPayload) -> AppResult<Event> {
        let current = self.get_event_by_slug(slug).await?;
        let next = validate_event_patch(&current, patch)?;
        ensure_canonical(&next)?;

        let mut event = next.into_event(current.id, current.created_at);
        event.updated_at = Utc::now();

        self.repo
            .replace_event(event)
            .await
            .map_err(write_error)?
            .ok_or_else(|| not_found(slug))
    }

    pub async fn get_event_by_slug(&self, slug: &str) -> AppResult<Event> {
        self.repo
            .find_event_by_slug(slug)
            .await
            .map_err(read_error)?
            .ok_or_else(|| not_found(slug))
    }

    pub async fn list_events(&self) -> AppResult<Vec<Event>> {
        self.repo.list_events().await.map_err(read_error)
    }
}

fn not_found(slug: &str) -> AppError {
    AppError::NotFound(format!("event '{slug}' not found"))
}

fn write_error(e: StoreError) -> AppError {
    match e {
        StoreError::UniqueViolation { .. } => {
            AppError::Conflict("an event with this slug already exists".to_string())
        }
        other => read_error(other),
    }
}
