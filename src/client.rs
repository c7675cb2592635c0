use async_trait::async_trait;

use thiserror::Error;

mod email_client;

pub use email_client::{EmailAuthorizationToken, EmailClient};

/// Rendered email message
#[derive(Debug, Clone, PartialEq)]
pub struct Email {
    pub subject: String,
    pub html_body: String,
    pub text_body: String,
}

/// Outbound notification seam
///
/// Implementations are pure transports: the caller renders the message.
#[async_trait]
pub trait NotificationSender: Send + Sync {
    async fn send(&self, recipient: &str, email: &Email) -> Result<(), DeliveryError>;
}

#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("Email API request failed")]
    Transport(#[from] reqwest::Error),
}
