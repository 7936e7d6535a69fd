//! # SMS Service
//!
//! SMS delivery behind a trait, mirroring [`super::email`].
//!
//! ## Implementations
//!
//! - [`LogSms`] - Development implementation that logs messages to console
//! - [`ExternalSms`] - Production implementation posting to an SMS gateway

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, error, info, instrument};

use super::DeliveryError;

/// Trait for SMS sending services
#[async_trait]
pub trait SmsService: Send + Sync {
    /// Sends a text message to `phone_number`.
    ///
    /// # Errors
    ///
    /// Returns [`DeliveryError::SendFailed`] if the gateway rejects the
    /// message or cannot be reached.
    async fn send_sms(&self, phone_number: &str, message: &str) -> Result<(), DeliveryError>;
}

/// Keeps the last four digits of a phone number, e.g. `+******7890`.
pub fn mask_phone_number(phone: &str) -> String {
    let digits = phone.chars().filter(char::is_ascii_digit).count();
    if digits <= 4 {
        return "*".repeat(phone.chars().count());
    }

    let mut to_mask = digits - 4;
    phone
        .chars()
        .map(|c| {
            if c.is_ascii_digit() && to_mask > 0 {
                to_mask -= 1;
                '*'
            } else {
                c
            }
        })
        .collect()
}

/// Mock SMS service for development
pub struct LogSms;

#[async_trait]
impl SmsService for LogSms {
    #[instrument(skip(self, phone_number, message), fields(phone = %mask_phone_number(phone_number)))]
    async fn send_sms(&self, phone_number: &str, message: &str) -> Result<(), DeliveryError> {
        info!("Sending mock SMS");

        println!("======= MOCK SMS SENT =======");
        println!("To: {phone_number}");
        println!("-----------------------------");
        println!("{message}");
        println!("=============================");

        Ok(())
    }
}

/// Gateway reply. Providers answer 200 even for rejected messages and put
/// the verdict in the body.
#[derive(Debug, Deserialize)]
struct GatewayReply {
    code: i64,
    #[serde(default)]
    msg: String,
}

/// SMS gateway client for production use
///
/// Account and key are injected at construction; the key is sent as a bearer
/// token and never logged.
pub struct ExternalSms {
    api_url: String,
    account: String,
    api_key: SecretString,
    http_client: reqwest::Client,
}

impl ExternalSms {
    pub fn new(api_url: String, account: String, api_key: SecretString) -> Self {
        info!(api_url = %api_url, account = %account, "Initializing external SMS service");

        Self {
            api_url,
            account,
            api_key,
            http_client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl SmsService for ExternalSms {
    #[instrument(
        skip(self, phone_number, message),
        fields(phone = %mask_phone_number(phone_number), account = %self.account)
    )]
    async fn send_sms(&self, phone_number: &str, message: &str) -> Result<(), DeliveryError> {
        let payload = json!({
            "account": self.account,
            "mobile": phone_number,
            "content": message,
        });

        debug!("Sending HTTP request to SMS gateway");
        let response = self
            .http_client
            .post(&self.api_url)
            .bearer_auth(self.api_key.expose_secret())
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "Network request to SMS gateway failed");
                DeliveryError::SendFailed(format!("Network request error: {e}"))
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error response body".to_string());
            error!(status = %status, error_body = %error_body, "SMS gateway returned error");
            return Err(DeliveryError::SendFailed(format!(
                "SMS gateway error: {error_body}"
            )));
        }

        let reply: GatewayReply = response.json().await.map_err(|e| {
            error!(error = %e, "SMS gateway reply could not be decoded");
            DeliveryError::SendFailed(format!("Malformed gateway reply: {e}"))
        })?;

        if reply.code != 0 {
            error!(code = reply.code, msg = %reply.msg, "SMS gateway rejected message");
            return Err(DeliveryError::SendFailed(format!(
                "SMS gateway rejected message: {}",
                reply.msg
            )));
        }

        info!("SMS sent successfully via gateway");
        Ok(())
    }
}
