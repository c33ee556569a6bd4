pub mod event;
pub mod booking;

pub use event::{Event, EventMode, EventPayload, NewEvent};
pub use booking::{Booking, BookingPayload, NewBooking};
