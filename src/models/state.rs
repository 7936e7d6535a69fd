use std::sync::Arc;

use tracing::info;

use crate::services::{email::EmailService, sms::SmsService};
use crate::throttle::{ThrottleConfig, ThrottleGuard};

/// Application state shared across requests. Needs to be thread-safe.
pub struct AppState {
    /// Issuance throttle and code store, one per process.
    pub throttle: Arc<ThrottleGuard>,
    /// Delivers codes for email channels.
    pub email_service: Arc<dyn EmailService>,
    /// Delivers codes for SMS channels.
    pub sms_service: Arc<dyn SmsService>,
}

impl AppState {
    pub fn new(
        throttle_config: ThrottleConfig,
        email_service: Arc<dyn EmailService>,
        sms_service: Arc<dyn SmsService>,
    ) -> Self {
        info!("Initializing application state");

        Self {
            throttle: Arc::new(ThrottleGuard::new(throttle_config)),
            email_service,
            sms_service,
        }
    }
}
