use async_trait::async_trait;

use thiserror::Error;

use crate::domain::{Booking, NewBooking};

mod bookings;

pub use bookings::{BookingRepo, PgBookingStore};

/// Persistence seam for bookings
///
/// The intake endpoint only ever creates records; reading, updating and deleting happen elsewhere
/// if at all.
#[async_trait]
pub trait BookingStore: Send + Sync {
    /// Durably write a new booking, returning the stored record with its assigned ID and
    /// creation timestamp
    async fn save(&self, new_booking: &NewBooking) -> Result<Booking, StoreError>;
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error")]
    Database(#[from] sqlx::Error),

    #[error("Stored record is malformed: {0}")]
    Malformed(String),
}
