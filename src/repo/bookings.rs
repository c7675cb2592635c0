use async_trait::async_trait;

use chrono::{DateTime, Utc};

use sqlx::{FromRow, PgExecutor, PgPool};

use uuid::Uuid;

use crate::domain::{Booking, NewBooking};

use super::{BookingStore, StoreError};

/// Raw `bookings` row, before the status text is parsed back into the domain
#[derive(Debug, FromRow)]
struct BookingRow {
    id: Uuid,
    service: String,
    date: DateTime<Utc>,
    name: String,
    email: String,
    phone: Option<String>,
    message: Option<String>,
    status: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<BookingRow> for Booking {
    type Error = StoreError;

    fn try_from(row: BookingRow) -> Result<Self, StoreError> {
        let status = row.status.parse().map_err(StoreError::Malformed)?;

        Ok(Self {
            id: row.id,
            service: row.service,
            date: row.date,
            name: row.name,
            email: row.email,
            phone: row.phone,
            message: row.message,
            status,
            created_at: row.created_at,
        })
    }
}

/// Repository for interfacing with the `bookings` table
pub struct BookingRepo;

impl BookingRepo {
    #[tracing::instrument(name = "Insert booking", skip(executor))]
    pub async fn insert<'con>(
        executor: impl PgExecutor<'con>,
        new_booking: &NewBooking,
    ) -> Result<Booking, StoreError> {
        let row = sqlx::query_as::<_, BookingRow>(
            "insert into bookings(service, date, name, email, phone, message, status) \
             values ($1, $2, $3, $4, $5, $6, $7) \
             returning id, service, date, name, email, phone, message, status, created_at",
        )
        .bind(&new_booking.service)
        .bind(new_booking.date.as_ref())
        .bind(&new_booking.name)
        .bind(&new_booking.email)
        .bind(&new_booking.phone)
        .bind(&new_booking.message)
        .bind(new_booking.status.as_str())
        .fetch_one(executor)
        .await?;

        row.try_into()
    }
}

/// PostgreSQL-backed booking store
#[derive(Debug, Clone)]
pub struct PgBookingStore {
    pool: PgPool,
}

impl PgBookingStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookingStore for PgBookingStore {
    async fn save(&self, new_booking: &NewBooking) -> Result<Booking, StoreError> {
        BookingRepo::insert(&self.pool, new_booking).await
    }
}
