//! # Application Configuration
//!
//! Everything the process needs at start-up, read once from the environment
//! (after `.env` has been loaded by the binary). Delivery credentials are
//! injected here and handed to the services; nothing is embedded in code.

use std::env;
use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use crate::error::ConfigError;
use crate::services::email::{EmailService, ExternalEmailer, LogEmailer};
use crate::services::sms::{ExternalSms, LogSms, SmsService};
use crate::throttle::{ThrottleConfig, env_secs};
use crate::utils::constant::{DEFAULT_BIND_ADDR, DEFAULT_SWEEP_INTERVAL};
use crate::utils::secret::require_secret;

/// Process-wide settings.
#[derive(Debug, Clone)]
pub struct Settings {
    pub bind_addr: String,
    pub production: bool,
    pub throttle: ThrottleConfig,
    pub sweep_interval: Duration,
}

impl Settings {
    /// # Environment Variables
    ///
    /// - `APP_ENV` - "production" selects the external delivery providers
    /// - `BIND_ADDR` - listen address, defaults to [`DEFAULT_BIND_ADDR`]
    /// - `SWEEP_INTERVAL_SECS` - period of the expired-entry sweep
    /// - throttle variables, see [`ThrottleConfig::from_env`]
    pub fn from_env() -> Result<Self, ConfigError> {
        let production = env::var("APP_ENV")
            .map(|v| v.eq_ignore_ascii_case("production"))
            .unwrap_or(false);
        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());
        let sweep_interval = env_secs("SWEEP_INTERVAL_SECS")?.unwrap_or(DEFAULT_SWEEP_INTERVAL);
        if sweep_interval.is_zero() {
            return Err(ConfigError::Invalid(
                "`SWEEP_INTERVAL_SECS` must be positive".to_string(),
            ));
        }

        Ok(Self {
            bind_addr,
            production,
            throttle: ThrottleConfig::from_env()?,
            sweep_interval,
        })
    }

    /// Builds the email and SMS senders for this environment.
    ///
    /// # Environment Variables (production only)
    ///
    /// - `MAIL_API_URL`, `SENDER_EMAIL`, `MAIL_API_KEY` or `MAIL_API_KEY_FILE`
    /// - `SMS_API_URL`, `SMS_ACCOUNT`, `SMS_API_KEY` or `SMS_API_KEY_FILE`
    pub fn delivery_services(&self) -> Result<(Arc<dyn EmailService>, Arc<dyn SmsService>), ConfigError> {
        if !self.production {
            info!("Running in development mode with [LogEmailer] and [LogSms]");
            return Ok((Arc::new(LogEmailer), Arc::new(LogSms)));
        }

        info!("Running in production mode with [ExternalEmailer] and [ExternalSms]");
        let emailer = ExternalEmailer::new(
            required("MAIL_API_URL")?,
            require_secret("MAIL_API_KEY_FILE", "MAIL_API_KEY")?,
            required("SENDER_EMAIL")?,
        );
        let sms = ExternalSms::new(
            required("SMS_API_URL")?,
            required("SMS_ACCOUNT")?,
            require_secret("SMS_API_KEY_FILE", "SMS_API_KEY")?,
        );

        Ok((Arc::new(emailer), Arc::new(sms)))
    }
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    env::var(name).map_err(|_| ConfigError::Missing(name))
}
