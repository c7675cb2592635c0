use std::net::TcpListener;
use std::sync::Arc;

use anyhow::Context;

use booking_intake::app;
use booking_intake::client::EmailClient;
use booking_intake::repo::PgBookingStore;
use booking_intake::settings::Settings;
use booking_intake::telemetry;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine; the settings files carry the defaults
    let _ = dotenvy::dotenv();

    let subscriber = telemetry::create_subscriber("info", std::io::stdout);
    telemetry::set_subscriber(subscriber)?;

    let settings = Settings::load()?;

    let pool = settings
        .database
        .pool_options()
        .connect_with(settings.database.connect_options()?)
        .await
        .context("Failed to connect to the database")?;
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run database migrations")?;

    let email_client = EmailClient::new(
        settings.email.sender(),
        settings.email.api_timeout(),
        settings.email.api_base_url()?,
        settings.email.api_auth_token(),
    )?;

    let listener = TcpListener::bind(settings.app.addr())?;
    tracing::info!("Listening on {}", listener.local_addr()?);

    let result = app::run(
        listener,
        Arc::new(PgBookingStore::new(pool.clone())),
        Arc::new(email_client),
        settings.app.allowed_origin().to_string(),
    )?
    .await
    .context("Failed to run app");

    pool.close().await;
    result
}
