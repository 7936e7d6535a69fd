//! # Verification Handlers
//!
//! HTTP front of the verification throttle:
//!
//! 1. `send-code` reserves an issuance slot for (channel, user), delivers a
//!    fresh code over the channel's medium and rolls the reservation back if
//!    delivery fails
//! 2. `verify-code` checks a submitted code against the live one
//!
//! The caller supplies the user id and the destination; looking them up is
//! the user store's job.

use std::sync::Arc;

use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::models::AppState;
use crate::services::DeliveryError;
use crate::throttle::{ChannelType, Medium, UserId};
use crate::utils::validator::{is_valid_destination, is_well_formed_code};

/// Request payload for issuing a verification code
#[derive(Debug, Deserialize, Validate)]
pub struct SendCodeRequest {
    pub channel: ChannelType,
    pub user_id: UserId,
    /// Email address or phone number, depending on the channel
    #[validate(length(min = 1, max = 254))]
    pub destination: String,
}

/// Request payload for checking a submitted code
#[derive(Debug, Deserialize, Validate)]
pub struct VerifyCodeRequest {
    pub channel: ChannelType,
    pub user_id: UserId,
    #[validate(length(min = 1, max = 32))]
    pub code: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct VerifyCodeResponse {
    pub verified: bool,
}

/// Issues a verification code for `(channel, user_id)` and delivers it.
///
/// # Rate Limiting
///
/// One code per re-issue interval per (channel, user). The slot is reserved
/// atomically before delivery, so concurrent requests cannot both send.
///
/// # Returns
///
/// - `200 OK` - Verification code sent
/// - `400 Bad Request` - Destination malformed for the channel
/// - `429 Too Many Requests` - Interval not yet elapsed, with `Retry-After`
/// - `500 Internal Server Error` - Delivery failed, reservation rolled back
#[instrument(
    skip(state, payload),
    fields(
        channel = %payload.channel,
        user_id = payload.user_id,
        request_id = %uuid::Uuid::new_v4()
    )
)]
pub async fn send_code(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<SendCodeRequest>,
) -> AppResult<impl IntoResponse> {
    debug!("Processing verification code request");

    // 1. Validate format
    let medium = payload.channel.medium();
    if payload.validate().is_err() || !is_valid_destination(medium, &payload.destination) {
        warn!(?medium, "Invalid destination provided");
        return Err(AppError::BadRequest("Invalid destination"));
    }

    // 2. Reserve the slot with a fresh code
    let throttle = &state.throttle;
    let code = throttle.generate_code();
    let reservation = match throttle.reserve(payload.channel, payload.user_id, &code) {
        Ok(reservation) => reservation,
        Err(retry_after) => {
            warn!(
                remaining_seconds = retry_after.as_secs(),
                "Rate limit exceeded for user"
            );
            return Err(AppError::RateLimited { retry_after });
        }
    };
    debug!("Reserved issuance slot");

    // 3. Deliver, undo the reservation on failure
    let delivered = deliver(&state, payload.channel, &payload.destination, reservation.code()).await;
    if let Err(e) = delivered {
        let restored = throttle.cancel_issuance(reservation);
        debug!(restored, "Rolled back reservation after failed delivery");
        return Err(e.into());
    }

    info!("Successfully sent verification code");
    Ok((StatusCode::OK, "Verification code sent"))
}

async fn deliver(
    state: &AppState,
    channel: ChannelType,
    destination: &str,
    code: &str,
) -> Result<(), DeliveryError> {
    match channel.medium() {
        Medium::Email => {
            state
                .email_service
                .send_email(
                    destination,
                    channel.subject(),
                    &format!("Your verification code is: {code}"),
                )
                .await
        }
        Medium::Sms => {
            state
                .sms_service
                .send_sms(
                    destination,
                    &format!("Your verification code is: {code}. Do not share it with anyone."),
                )
                .await
        }
    }
}

/// Checks a submitted code against the live one for `(channel, user_id)`.
///
/// # Returns
///
/// - `200 OK` - Code matches and is within its validity window
/// - `400 Bad Request` - Malformed, wrong, or expired code
#[instrument(
    skip(state, payload),
    fields(
        channel = %payload.channel,
        user_id = payload.user_id,
        request_id = %uuid::Uuid::new_v4()
    )
)]
pub async fn verify_code(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<VerifyCodeRequest>,
) -> AppResult<impl IntoResponse> {
    debug!("Processing code verification request");

    let code_length = state.throttle.config().code_length();
    if payload.validate().is_err() || !is_well_formed_code(&payload.code, code_length) {
        warn!("Invalid verification request format");
        return Err(AppError::BadRequest("Invalid input"));
    }

    if !state
        .throttle
        .verify_code(payload.channel, payload.user_id, &payload.code)
    {
        warn!("Invalid or expired verification code provided");
        return Err(AppError::BadRequest("Invalid or expired code"));
    }

    info!("Code verification completed successfully");
    Ok((StatusCode::OK, Json(VerifyCodeResponse { verified: true })))
}
