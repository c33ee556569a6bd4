use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::validation::EMAIL_RE;

/// Бронь: email, который записался на событие. Событие не принадлежит
/// брони, хранится только его идентификатор.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: Uuid,
    pub event_id: Uuid,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingPayload {
    pub event_id: Uuid,
    pub email: String,
}

/// Бронь после `validate_booking`: email уже нормализован.
#[derive(Debug, Clone, PartialEq, Eq, Validate)]
pub struct NewBooking {
    pub(crate) event_id: Uuid,
    #[validate(regex(path = *EMAIL_RE, message = "invalid email"))]
    pub(crate) email: String,
}

impl NewBooking {
    pub fn event_id(&self) -> Uuid {
        self.event_id
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub(crate) fn into_booking(self, id: Uuid, now: DateTime<Utc>) -> Booking {
        Booking {
            id,
            event_id: self.event_id,
            email: self.email,
            created_at: now,
            updated_at: now,
        }
    }
}
