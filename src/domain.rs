mod booking;
mod booking_date;

pub use booking::{Booking, BookingStatus, NewBooking};
pub use booking_date::BookingDate;
