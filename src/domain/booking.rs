use std::str::FromStr;

use chrono::{DateTime, Utc};

use serde::{Deserialize, Serialize};

use uuid::Uuid;

use super::BookingDate;

/// Booking lifecycle status
///
/// Only `Pending` is ever written by the intake endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    #[default]
    Pending,
    Confirmed,
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl FromStr for BookingStatus {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "pending" => Ok(Self::Pending),
            "confirmed" => Ok(Self::Confirmed),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(format!("{} is not a valid booking status", other)),
        }
    }
}

/// New Booking request, checked for required fields but not yet stored
#[derive(Debug, Clone)]
pub struct NewBooking {
    pub service: String,
    pub date: BookingDate,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub message: Option<String>,
    pub status: BookingStatus,
}

/// Stored Booking record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    /// ID assigned by the store
    pub id: Uuid,
    pub service: String,
    pub date: DateTime<Utc>,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub status: BookingStatus,
    /// Creation timestamp
    /// NOTE: Set by the store on insert, never changed afterwards
    pub created_at: DateTime<Utc>,
}

impl Booking {
    pub fn booking_date(&self) -> BookingDate {
        self.date.into()
    }
}
