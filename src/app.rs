use std::net::TcpListener;
use std::sync::Arc;

use actix_cors::Cors;

use actix_web::dev::Server;
use actix_web::http::header;
use actix_web::{get, HttpResponse, Responder};
use actix_web::{web, App, HttpServer};

use tracing_actix_web::TracingLogger;

use crate::client::NotificationSender;
use crate::controller::bookings;
use crate::repo::BookingStore;

/// Simple health-check endpoint
#[tracing::instrument(name = "Health check")]
#[get("/health_check")]
async fn health_check() -> impl Responder {
    HttpResponse::Ok().finish()
}

/// Cross-origin policy: one browser origin may post bookings
fn cors(allowed_origin: &str) -> Cors {
    Cors::default()
        .allowed_origin(allowed_origin)
        .allowed_methods(vec!["POST"])
        .allowed_header(header::CONTENT_TYPE)
        .max_age(3600)
}

/// Run the application on a specified TCP listener
pub fn run(
    listener: TcpListener,
    store: Arc<dyn BookingStore>,
    notifier: Arc<dyn NotificationSender>,
    allowed_origin: String,
) -> anyhow::Result<Server> {
    // Wrap application data
    let store: web::Data<dyn BookingStore> = web::Data::from(store);
    let notifier: web::Data<dyn NotificationSender> = web::Data::from(notifier);

    // Start the server
    let server = HttpServer::new(move || {
        App::new()
            .wrap(cors(&allowed_origin))
            .wrap(TracingLogger::default())
            .app_data(store.clone())
            .app_data(notifier.clone())
            .service(health_check)
            .service(bookings::scope())
    })
    .listen(listener)?
    .run();

    Ok(server)
}
