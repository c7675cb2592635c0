/// Booking intake endpoint
pub mod bookings;
