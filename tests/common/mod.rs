use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, Once};
use std::time::Duration;

use async_trait::async_trait;
use edgex_admin::{
    services::{DeliveryError, email::EmailService, sms::SmsService},
    throttle::ThrottleConfig,
};
use serde_json::{Value, json};
use tokio::net::TcpListener;

pub fn init_tracing_once() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter("edgex_admin=debug")
            .with_test_writer()
            .init();
    });
}

#[allow(dead_code)]
#[derive(Debug, Clone)]
pub struct SentMessage {
    pub destination: String,
    pub subject: Option<String>,
    pub body: String,
}

/// A delivery mock that records every message and can be told to fail.
/// Serves as both the email and the SMS service.
#[derive(Debug, Default)]
pub struct MockDelivery {
    sent: Mutex<Vec<SentMessage>>,
    fail: AtomicBool,
}

impl MockDelivery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent sends fail (or succeed again).
    #[allow(dead_code)]
    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    #[allow(dead_code)]
    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }

    #[allow(dead_code)]
    pub fn last_sent(&self) -> Option<SentMessage> {
        self.sent.lock().unwrap().last().cloned()
    }

    fn record(&self, destination: &str, subject: Option<&str>, body: &str) -> Result<(), DeliveryError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(DeliveryError::SendFailed("mock failure".to_string()));
        }
        self.sent.lock().unwrap().push(SentMessage {
            destination: destination.to_string(),
            subject: subject.map(str::to_string),
            body: body.to_string(),
        });
        Ok(())
    }
}

#[async_trait]
impl EmailService for MockDelivery {
    async fn send_email(
        &self,
        recipient: &str,
        subject: &str,
        body_html: &str,
    ) -> Result<(), DeliveryError> {
        self.record(recipient, Some(subject), body_html)
    }
}

#[async_trait]
impl SmsService for MockDelivery {
    async fn send_sms(&self, phone_number: &str, message: &str) -> Result<(), DeliveryError> {
        self.record(phone_number, None, message)
    }
}

/// Extracts the digits following "Your verification code is: ".
#[allow(dead_code)]
pub fn extract_code(body: &str) -> String {
    body.trim_start_matches("Your verification code is: ")
        .chars()
        .take_while(char::is_ascii_digit)
        .collect()
}

// health_check only needs the address and the client.
#[allow(dead_code)]
pub struct TestApp {
    pub address: String,
    pub email: Arc<MockDelivery>,
    pub sms: Arc<MockDelivery>,
    pub client: reqwest::Client,
}

#[allow(dead_code)]
impl TestApp {
    pub async fn send_code(&self, channel: &str, user_id: u64, destination: &str) -> reqwest::Response {
        self.client
            .post(format!("{}/api/verification/send-code", self.address))
            .json(&json!({
                "channel": channel,
                "user_id": user_id,
                "destination": destination,
            }))
            .send()
            .await
            .expect("Failed to execute send-code request")
    }

    pub async fn verify_code(&self, channel: &str, user_id: u64, code: &str) -> reqwest::Response {
        self.client
            .post(format!("{}/api/verification/verify-code", self.address))
            .json(&json!({
                "channel": channel,
                "user_id": user_id,
                "code": code,
            }))
            .send()
            .await
            .expect("Failed to execute verify-code request")
    }

    pub async fn message(response: reqwest::Response) -> String {
        let body: Value = response.json().await.expect("Failed to parse error body");
        body["message"].as_str().unwrap_or_default().to_string()
    }
}

/// Spawns the application with default throttle settings.
pub async fn spawn_app() -> TestApp {
    spawn_app_with(ThrottleConfig::default()).await
}

/// Spawns the application on a random port with mock delivery services.
pub async fn spawn_app_with(throttle_config: ThrottleConfig) -> TestApp {
    init_tracing_once();

    let email = Arc::new(MockDelivery::new());
    let sms = Arc::new(MockDelivery::new());
    let email_cloned: Arc<dyn EmailService> = email.clone();
    let sms_cloned: Arc<dyn SmsService> = sms.clone();

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port at localhost");
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        let app = edgex_admin::app_with_services(
            throttle_config,
            Duration::from_secs(60),
            email_cloned,
            sms_cloned,
        );
        axum::serve(listener, app).await.unwrap();
    });

    TestApp {
        address: format!("http://127.0.0.1:{port}"),
        email,
        sms,
        client: reqwest::Client::new(),
    }
}
