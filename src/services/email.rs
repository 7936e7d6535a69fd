//! # Email Service
//!
//! Email delivery behind a trait so handlers can be tested with a mock and
//! production can talk to a real provider.
//!
//! ## Implementations
//!
//! - [`LogEmailer`] - Development implementation that logs emails to console
//! - [`ExternalEmailer`] - Production implementation using an external email API

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use tracing::{debug, error, info, instrument};

use super::DeliveryError;

/// Trait for email sending services
#[async_trait]
pub trait EmailService: Send + Sync {
    /// Sends an email to the specified recipient.
    ///
    /// # Errors
    ///
    /// Returns [`DeliveryError::SendFailed`] if the provider rejects the
    /// message or cannot be reached.
    async fn send_email(
        &self,
        recipient: &str,
        subject: &str,
        body_html: &str,
    ) -> Result<(), DeliveryError>;
}

/// Mock email service for development
///
/// Prints the email instead of sending it.
pub struct LogEmailer;

#[async_trait]
impl EmailService for LogEmailer {
    #[instrument(skip(self, body_html), fields(recipient = %recipient, subject = %subject))]
    async fn send_email(
        &self,
        recipient: &str,
        subject: &str,
        body_html: &str,
    ) -> Result<(), DeliveryError> {
        info!("Sending mock email");

        println!("====== MOCK EMAIL SENT ======");
        println!("To: {recipient}");
        println!("Subject: {subject}");
        println!("-----------------------------");
        println!("{body_html}");
        println!("=============================");

        Ok(())
    }
}

/// External email service for production use
///
/// Posts a JSON message to the provider's API, authenticating with basic
/// auth. The key is injected by the caller and never logged.
pub struct ExternalEmailer {
    api_url: String,
    api_key: SecretString,
    sender_email: String,
    http_client: reqwest::Client,
}

impl ExternalEmailer {
    pub fn new(api_url: String, api_key: SecretString, sender_email: String) -> Self {
        info!(
            api_url = %api_url,
            sender_email = %sender_email,
            "Initializing external email service"
        );

        Self {
            api_url,
            api_key,
            sender_email,
            http_client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl EmailService for ExternalEmailer {
    #[instrument(
        skip(self, body_html),
        fields(
            recipient = %recipient,
            subject = %subject,
            sender = %self.sender_email
        )
    )]
    async fn send_email(
        &self,
        recipient: &str,
        subject: &str,
        body_html: &str,
    ) -> Result<(), DeliveryError> {
        let payload = json!({
            "to": recipient,
            "from": self.sender_email,
            "subject": subject,
            "content": [{ "type": "text/html", "value": body_html }]
        });

        debug!("Sending HTTP request to email API");
        let response = self
            .http_client
            .post(&self.api_url)
            .basic_auth("api", Some(self.api_key.expose_secret()))
            .json(&payload)
            .send()
            .await;

        match response {
            Ok(res) if res.status().is_success() => {
                info!("Email sent successfully via external API");
                Ok(())
            }
            Ok(res) => {
                let status = res.status();
                let error_body = res
                    .text()
                    .await
                    .unwrap_or_else(|_| "Failed to read error response body".to_string());

                error!(
                    status = %status,
                    error_body = %error_body,
                    "External email API returned error"
                );

                Err(DeliveryError::SendFailed(format!(
                    "Email provider API error: {error_body}"
                )))
            }
            Err(e) => {
                error!(error = %e, "Network request to email API failed");
                Err(DeliveryError::SendFailed(format!(
                    "Network request error: {e}"
                )))
            }
        }
    }
}
