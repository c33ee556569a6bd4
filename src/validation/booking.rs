use validator::Validate;

use super::trim;
use crate::error::{AppError, AppResult};
use crate::models::{BookingPayload, NewBooking};

pub fn normalize_email(email: &str) -> String {
    trim(email).to_lowercase()
}

/// Локальная часть проверки брони: только форма email.
///
/// Существование события проверяется отдельно и позже, уже с обращением
/// к хранилищу, чтобы не ходить в БД с заведомо битым вводом.
pub fn validate_booking(payload: BookingPayload) -> AppResult<NewBooking> {
    let booking = NewBooking {
        event_id: payload.event_id,
        email: normalize_email(&payload.email),
    };
    booking.validate().map_err(super::into_app_error)?;
    Ok(booking)
}

/// Email в брони уже должен быть нормализован и проходить по шаблону.
pub(crate) fn ensure_canonical(booking: &NewBooking) -> AppResult<()> {
    booking.validate().map_err(super::into_app_error)?;
    if normalize_email(&booking.email) != booking.email {
        return Err(AppError::validation("invalid email"));
    }
    Ok(())
}
