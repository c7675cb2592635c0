use std::net::TcpListener;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use chrono::Utc;

use reqwest::{Client, Method, Response};

use secrecy::Secret;

use serde::Serialize;

use url::Url;

use uuid::Uuid;

use wiremock::MockServer;

use booking_intake::app;
use booking_intake::client::EmailClient;
use booking_intake::domain::{Booking, NewBooking};
use booking_intake::repo::{BookingStore, StoreError};

pub const ALLOWED_ORIGIN: &str = "https://bookings.test";

#[derive(Debug, Default, Clone, Serialize)]
pub struct NewBookingBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl NewBookingBody {
    pub fn valid() -> Self {
        Self {
            service: Some("Haircut".into()),
            date: Some("2024-05-01".into()),
            name: Some("Jane Doe".into()),
            email: Some("jane@example.com".into()),
            phone: Some("555-1234".into()),
            message: Some("Prefer morning".into()),
        }
    }
}

/// In-memory store that records every saved booking
#[derive(Debug, Default)]
pub struct RecordingStore {
    saved: Mutex<Vec<Booking>>,
    fail: bool,
}

impl RecordingStore {
    pub fn failing() -> Self {
        Self {
            saved: Mutex::default(),
            fail: true,
        }
    }

    pub fn saved(&self) -> Vec<Booking> {
        self.saved.lock().unwrap().clone()
    }
}

#[async_trait]
impl BookingStore for RecordingStore {
    async fn save(&self, new_booking: &NewBooking) -> Result<Booking, StoreError> {
        if self.fail {
            return Err(StoreError::Database(sqlx::Error::PoolTimedOut));
        }

        let booking = Booking {
            id: Uuid::new_v4(),
            service: new_booking.service.clone(),
            date: *new_booking.date.as_ref(),
            name: new_booking.name.clone(),
            email: new_booking.email.clone(),
            phone: new_booking.phone.clone(),
            message: new_booking.message.clone(),
            status: new_booking.status,
            created_at: Utc::now(),
        };
        self.saved.lock().unwrap().push(booking.clone());

        Ok(booking)
    }
}

pub struct TestApp {
    addr: String,

    pub client: Client,
    pub email_server: MockServer,
    pub store: Arc<RecordingStore>,
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_with(RecordingStore::default()).await
    }

    pub async fn spawn_with(store: RecordingStore) -> Self {
        let store = Arc::new(store);
        let (addr, email_server) = spawn_server(store.clone()).await;

        Self {
            addr,
            client: Client::new(),
            email_server,
            store,
        }
    }

    pub fn request(&self, method: Method, url: &str) -> reqwest::RequestBuilder {
        let url = format!("{}/{}", &self.addr, url);
        self.client.request(method, url)
    }

    pub async fn health_check(&self) -> reqwest::Result<Response> {
        self.request(Method::GET, "health_check").send().await
    }

    pub async fn booking_create(&self, body: &NewBookingBody) -> reqwest::Result<Response> {
        self.request(Method::POST, "api/bookings")
            .json(body)
            .send()
            .await
    }
}

/// Spawn the app against `store` and a mock email API, returning the app address
pub async fn spawn_server(store: Arc<dyn BookingStore>) -> (String, MockServer) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to listen on random port");
    let port = listener.local_addr().unwrap().port();

    let addr = format!("http://127.0.0.1:{}", port);

    let email_server = MockServer::start().await;

    let email_client = {
        let sender = "\"Test Bookings\" <test@test.com>".to_string();
        let api_base_url =
            Url::parse(&email_server.uri()).expect("Failed to parse mock server uri");
        let api_auth_token = Secret::new("TestAuthorization".to_string());
        let api_timeout = Duration::from_secs(2);

        EmailClient::new(sender, api_timeout, api_base_url, api_auth_token.into())
            .expect("Failed to create email client")
    };

    let server = app::run(
        listener,
        store,
        Arc::new(email_client),
        ALLOWED_ORIGIN.to_string(),
    )
    .expect("Failed to spawn app instance");
    let _ = tokio::spawn(server);

    (addr, email_server)
}
