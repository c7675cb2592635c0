use std::convert::Infallible;
use std::str::FromStr;
use std::time::Duration;

use anyhow::Context;

use async_trait::async_trait;

use reqwest::Client;

use serde::Serialize;

use secrecy::Secret;

use url::Url;

use super::{DeliveryError, Email, NotificationSender};

const POSTMARK_TOKEN_HEADER: &str = "X-Postmark-Server-Token";

/// REST client for a Postmark-compatible email API
#[derive(Debug)]
pub struct EmailClient {
    client: Client,
    /// Rendered `From` header, e.g. `"JBLC Bookings" <bookings@example.com>`
    sender: String,

    api_send_email_url: Url,
    api_auth_token: EmailAuthorizationToken,
}

impl EmailClient {
    pub fn new(
        sender: String,
        api_timeout: Duration,
        api_base_url: Url,
        api_auth_token: EmailAuthorizationToken,
    ) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(api_timeout)
            .build()
            .context("Failed to build http client")?;

        let api_send_email_url = api_base_url
            .join("email")
            .context("Failed to create send email endpoint URL")?;

        Ok(Self {
            client,
            sender,
            api_send_email_url,
            api_auth_token,
        })
    }
}

#[async_trait]
impl NotificationSender for EmailClient {
    #[tracing::instrument(name = "Send email", skip(self, email), fields(subject = %email.subject))]
    async fn send(&self, recipient: &str, email: &Email) -> Result<(), DeliveryError> {
        use secrecy::ExposeSecret;

        let body = SendEmailRequest {
            to: recipient,
            from: &self.sender,
            subject: &email.subject,
            html_body: &email.html_body,
            text_body: &email.text_body,
        };

        self.client
            .post(self.api_send_email_url.clone())
            .header(POSTMARK_TOKEN_HEADER, self.api_auth_token.expose_secret())
            .json(&body)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}

#[derive(Debug)]
pub struct EmailAuthorizationToken(Secret<String>);

impl FromStr for EmailAuthorizationToken {
    type Err = Infallible;

    fn from_str(value: &str) -> Result<Self, Infallible> {
        let value = value.to_string();
        let value = Secret::new(value);

        Ok(Self(value))
    }
}

impl From<Secret<String>> for EmailAuthorizationToken {
    fn from(value: Secret<String>) -> Self {
        Self(value)
    }
}

impl secrecy::ExposeSecret<String> for EmailAuthorizationToken {
    fn expose_secret(&self) -> &String {
        self.0.expose_secret()
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct SendEmailRequest<'a> {
    to: &'a str,
    from: &'a str,
    subject: &'a str,
    html_body: &'a str,
    text_body: &'a str,
}
