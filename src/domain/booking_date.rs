use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Requested appointment date
///
/// Accepts milliseconds since the Unix epoch, an RFC 3339 timestamp, a naive `YYYY-MM-DDTHH:MM:SS[.fff]` timestamp, or a bare
/// `YYYY-MM-DD` date. Naive values are read as UTC, bare dates as UTC midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookingDate(DateTime<Utc>);

impl BookingDate {
    /// Format the date the way it is shown in confirmation emails, e.g. `5/1/2024`
    pub fn to_short_date(&self) -> String {
        self.0.format("%-m/%-d/%Y").to_string()
    }
}

impl FromStr for BookingDate {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.trim();

        if let Ok(millis) = value.parse::<i64>() {
            return DateTime::from_timestamp_millis(millis)
                .map(Self)
                .ok_or_else(|| format!("{} is out of range for a date", millis));
        }
        if let Ok(timestamp) = DateTime::parse_from_rfc3339(value) {
            return Ok(Self(timestamp.with_timezone(&Utc)));
        }
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
            return Ok(Self(naive.and_utc()));
        }
        if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
            if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
                return Ok(Self(midnight.and_utc()));
            }
        }

        Err(format!("'{}' is not a recognizable date", value))
    }
}

impl From<DateTime<Utc>> for BookingDate {
    fn from(value: DateTime<Utc>) -> Self {
        Self(value)
    }
}

impl From<BookingDate> for DateTime<Utc> {
    fn from(value: BookingDate) -> Self {
        value.0
    }
}

impl AsRef<DateTime<Utc>> for BookingDate {
    fn as_ref(&self) -> &DateTime<Utc> {
        &self.0
    }
}

impl fmt::Display for BookingDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.to_rfc3339().fmt(f)
    }
}
