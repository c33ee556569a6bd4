pub mod bookings;
pub mod events;

pub use bookings::BookingService;
pub use events::EventService;

use crate::error::AppError;
use crate::store::StoreError;

/// Ошибка чтения: недоступность отличаем от всего остального.
pub(crate) fn read_error(e: StoreError) -> AppError {
    match e {
        StoreError::Unavailable(_) => AppError::Dependency("storage unavailable".to_string()),
        other => AppError::Internal(other.to_string()),
    }
}
