use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

use crate::error::AppError;

/// Сохраненное событие. Все поля уже в каноническом виде.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub overview: String,
    pub image: String,
    pub venue: String,
    pub location: String,
    /// `YYYY-MM-DD`
    pub date: String,
    /// `HH:MM`, 24 часа
    pub time: String,
    #[sqlx(try_from = "String")]
    pub mode: EventMode,
    pub audience: String,
    pub agenda: Vec<String>,
    pub organizer: String,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventMode {
    Online,
    Offline,
    Hybrid,
}

impl EventMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventMode::Online => "online",
            EventMode::Offline => "offline",
            EventMode::Hybrid => "hybrid",
        }
    }
}

impl fmt::Display for EventMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventMode {
    type Err = AppError;

    /// Регистр не важен, пробелы по краям отбрасываются.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match crate::validation::trim(s).to_lowercase().as_str() {
            "online" => Ok(EventMode::Online),
            "offline" => Ok(EventMode::Offline),
            "hybrid" => Ok(EventMode::Hybrid),
            _ => Err(AppError::validation(
                "mode must be online, offline, or hybrid",
            )),
        }
    }
}

impl TryFrom<String> for EventMode {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Входные данные события в том виде, как их прислал клиент.
///
/// Все поля необязательны на уровне формата: при создании отсутствующее
/// поле - ошибка валидации, при обновлении - "не менялось".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventPayload {
    pub title: Option<String>,
    pub description: Option<String>,
    pub overview: Option<String>,
    pub image: Option<String>,
    pub venue: Option<String>,
    pub location: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub mode: Option<String>,
    pub audience: Option<String>,
    pub agenda: Option<Vec<String>>,
    pub organizer: Option<String>,
    pub tags: Option<Vec<String>>,
}

/// Событие в каноническом виде, готовое к записи.
///
/// Снаружи крейта получить его можно только через `validate_event` или
/// `validate_event_patch`.
#[derive(Debug, Clone, PartialEq, Eq, Validate)]
pub struct NewEvent {
    #[validate(length(min = 1, message = "title is required"))]
    pub(crate) title: String,
    pub(crate) slug: String,
    #[validate(length(min = 1, message = "description is required"))]
    pub(crate) description: String,
    #[validate(length(min = 1, message = "overview is required"))]
    pub(crate) overview: String,
    #[validate(length(min = 1, message = "image is required"))]
    pub(crate) image: String,
    #[validate(length(min = 1, message = "venue is required"))]
    pub(crate) venue: String,
    #[validate(length(min = 1, message = "location is required"))]
    pub(crate) location: String,
    pub(crate) date: String,
    pub(crate) time: String,
    pub(crate) mode: EventMode,
    #[validate(length(min = 1, message = "audience is required"))]
    pub(crate) audience: String,
    #[validate(length(min = 1, message = "agenda must contain at least one item"))]
    pub(crate) agenda: Vec<String>,
    #[validate(length(min = 1, message = "organizer is required"))]
    pub(crate) organizer: String,
    #[validate(length(min = 1, message = "tags must contain at least one item"))]
    pub(crate) tags: Vec<String>,
}

impl NewEvent {
    /// Текущее состояние сохраненного события, от которого считается патч.
    pub(crate) fn from_stored(event: Event) -> Self {
        NewEvent {
            title: event.title,
            slug: event.slug,
            description: event.description,
            overview: event.overview,
            image: event.image,
            venue: event.venue,
            location: event.location,
            date: event.date,
            time: event.time,
            mode: event.mode,
            audience: event.audience,
            agenda: event.agenda,
            organizer: event.organizer,
            tags: event.tags,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn slug(&self) -> &str {
        &self.slug
    }

    pub fn date(&self) -> &str {
        &self.date
    }

    pub fn time(&self) -> &str {
        &self.time
    }

    pub fn mode(&self) -> EventMode {
        self.mode
    }

    pub fn agenda(&self) -> &[String] {
        &self.agenda
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub(crate) fn into_event(self, id: Uuid, now: DateTime<Utc>) -> Event {
        Event {
            id,
            title: self.title,
            slug: self.slug,
            description: self.description,
            overview: self.overview,
            image: self.image,
            venue: self.venue,
            location: self.location,
            date: self.date,
            time: self.time,
            mode: self.mode,
            audience: self.audience,
            agenda: self.agenda,
            organizer: self.organizer,
            tags: self.tags,
            created_at: now,
            updated_at: now,
        }
    }
}
