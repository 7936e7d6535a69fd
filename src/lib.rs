//! # edgex-admin - Verification Gate
//!
//! Issues and checks one-time verification codes for the admin backend,
//! throttling issuance per user and channel.
//!
//! ## Modules
//!
//! - [`throttle`] - The in-process issuance throttle and code store
//! - [`handlers`] - HTTP request handlers
//! - [`services`] - SMS/email delivery and the background sweeper
//! - [`config`] - Start-up configuration from the environment
//! - [`utils`] - Constants, secrets and validators

pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod services;
pub mod throttle;
pub mod utils;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    routing::{get, post},
};

use crate::config::Settings;
use crate::error::ConfigError;
use crate::handlers::{health_check, send_code, verify_code};
use crate::models::AppState;
use crate::services::{email::EmailService, sms::SmsService, sweeper::spawn_sweeper};
use crate::throttle::ThrottleConfig;

/// Creates the router from environment-derived [`Settings`], picking delivery
/// services according to `APP_ENV`.
///
/// Must be called inside a tokio runtime; it spawns the sweeper task.
pub fn app(settings: &Settings) -> Result<Router, ConfigError> {
    let (email_service, sms_service) = settings.delivery_services()?;
    Ok(app_with_services(
        settings.throttle,
        settings.sweep_interval,
        email_service,
        sms_service,
    ))
}

/// Creates the router with explicit delivery services.
///
/// Builds the shared [`AppState`], starts the background sweep of expired
/// throttle entries and mounts the routes.
pub fn app_with_services(
    throttle_config: ThrottleConfig,
    sweep_interval: Duration,
    email_service: Arc<dyn EmailService>,
    sms_service: Arc<dyn SmsService>,
) -> Router {
    let state = Arc::new(AppState::new(throttle_config, email_service, sms_service));

    spawn_sweeper(Arc::clone(&state.throttle), sweep_interval);

    Router::new()
        .route("/health-check", get(health_check))
        .route("/api/verification/send-code", post(send_code))
        .route("/api/verification/verify-code", post(verify_code))
        .with_state(state)
}
