use actix_web::dev::HttpServiceFactory;
use actix_web::http::StatusCode;
use actix_web::{post, web, HttpResponse, Responder, ResponseError};

use serde::{Deserialize, Deserializer, Serialize};

use serde_json::json;

use thiserror::Error;

use crate::client::{DeliveryError, Email, NotificationSender};
use crate::domain::{Booking, BookingStatus, NewBooking};
use crate::repo::{BookingStore, StoreError};

const CONFIRMATION_SUBJECT: &str = "Booking Confirmation";

/// JSON deserialization wrapper for parsing new bookings
///
/// Every field is optional at this level so that absent fields turn into a `400` with the
/// booking-specific message instead of a generic deserialization failure. JSON numbers are
/// accepted wherever text is expected and kept as their decimal text.
#[derive(Debug, Default, Deserialize)]
pub struct NewBookingForm {
    #[serde(default, deserialize_with = "text_or_number")]
    pub service: Option<String>,
    #[serde(default, deserialize_with = "text_or_number")]
    pub date: Option<String>,
    #[serde(default, deserialize_with = "text_or_number")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "text_or_number")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "text_or_number")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "text_or_number")]
    pub message: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TextOrNumber {
    Text(String),
    Number(serde_json::Number),
}

fn text_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<TextOrNumber>::deserialize(deserializer)?;

    Ok(value.map(|value| match value {
        TextOrNumber::Text(text) => text,
        TextOrNumber::Number(number) => number.to_string(),
    }))
}

impl NewBookingForm {
    /// Names of the required fields that are absent or empty
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("service", &self.service),
            ("date", &self.date),
            ("name", &self.name),
            ("email", &self.email),
        ]
        .into_iter()
        .filter(|(_, value)| value.as_deref().map_or(true, str::is_empty))
        .map(|(field, _)| field)
        .collect()
    }
}

impl TryFrom<NewBookingForm> for NewBooking {
    type Error = BookingError;

    fn try_from(form: NewBookingForm) -> Result<Self, BookingError> {
        let missing = form.missing_fields();
        let (Some(service), Some(date), Some(name), Some(email)) = (
            required(form.service),
            required(form.date),
            required(form.name),
            required(form.email),
        ) else {
            return Err(BookingError::MissingFields(missing));
        };

        let date = date.parse().map_err(BookingError::UnreadableDate)?;

        Ok(Self {
            service,
            date,
            name,
            email,
            phone: form.phone,
            message: form.message,
            status: BookingStatus::Pending,
        })
    }
}

fn required(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.is_empty())
}

#[derive(Debug, Serialize)]
struct BookingCreated {
    success: bool,
    booking: Booking,
}

/// Create endpoint for new bookings
///
/// The booking is stored first and the confirmation email is only sent once the write has
/// succeeded. A failed send leaves the stored booking in place.
#[tracing::instrument(
    name = "Create a new booking",
    skip(store, notifier, form),
    fields(booking.service = ?form.service, booking.id = tracing::field::Empty)
)]
#[post("")]
async fn create(
    store: web::Data<dyn BookingStore>,
    notifier: web::Data<dyn NotificationSender>,
    form: web::Json<NewBookingForm>,
) -> Result<impl Responder, BookingError> {
    // Check the required fields before touching anything downstream
    let new_booking: NewBooking = form.into_inner().try_into()?;

    // Store the booking
    let booking = store.save(&new_booking).await.map_err(|error| {
        tracing::error!(error.cause_chain = ?error, "Failed to store booking");
        BookingError::Store(error)
    })?;
    tracing::Span::current().record("booking.id", tracing::field::display(booking.id));

    // Send the confirmation email, only once the booking is stored
    let email = build_confirmation_email(&booking);
    notifier
        .send(&booking.email, &email)
        .await
        .map_err(|error| {
            // The booking stays stored; nothing flags it as unconfirmed
            tracing::error!(
                error.cause_chain = ?error,
                "Booking {} was stored but the confirmation email failed",
                booking.id
            );
            BookingError::Delivery(error)
        })?;

    Ok(HttpResponse::Created().json(BookingCreated {
        success: true,
        booking,
    }))
}

/// Build the confirmation email for a stored booking
///
/// Submitted text is HTML-escaped in the HTML body; the text body carries it as-is.
pub fn build_confirmation_email(booking: &Booking) -> Email {
    use html_escape::encode_text;

    let date = booking.booking_date().to_short_date();

    let html_body = format!(
        "<h2>Thank you for your booking, {}!</h2>\
         <p>Service: {}</p>\
         <p>Date: {}</p>\
         <p>We'll contact you soon to confirm details.</p>",
        encode_text(&booking.name),
        encode_text(&booking.service),
        date
    );
    let text_body = format!(
        "Thank you for your booking, {}!\n\nService: {}\nDate: {}\n\nWe'll contact you soon to confirm details.",
        booking.name, booking.service, date
    );

    Email {
        subject: CONFIRMATION_SUBJECT.into(),
        html_body,
        text_body,
    }
}

#[derive(Debug, Error)]
pub enum BookingError {
    #[error("Missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    #[error("Failed to read booking date: {0}")]
    UnreadableDate(String),

    #[error("Failed to store booking")]
    Store(#[source] StoreError),

    #[error("Failed to send confirmation email")]
    Delivery(#[source] DeliveryError),
}

impl BookingError {
    /// Message exposed to the caller; details stay in the logs
    fn public_message(&self) -> &'static str {
        match self {
            Self::MissingFields(_) => "Missing required fields",
            Self::InvalidBody(_) => "Invalid request body",
            Self::UnreadableDate(_) | Self::Store(_) | Self::Delivery(_) => {
                "Internal server error"
            }
        }
    }
}

impl ResponseError for BookingError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::MissingFields(_) | Self::InvalidBody(_) => StatusCode::BAD_REQUEST,
            Self::UnreadableDate(_) | Self::Store(_) | Self::Delivery(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({ "error": self.public_message() }))
    }
}

fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|error, _req| {
        tracing::warn!("Rejected booking payload: {}", error);
        BookingError::InvalidBody(error.to_string()).into()
    })
}

/// Bookings API endpoints
pub fn scope() -> impl HttpServiceFactory {
    web::scope("/api/bookings")
        .app_data(json_config())
        .service(create)
}
