//! # Centralized Error Handling
//!
//! [`AppError`] is what handlers return; it maps itself to an HTTP response and
//! logs delivery failures in one place. [`ConfigError`] is raised while the
//! application is being assembled and never reaches a request.

use std::time::Duration;

use axum::{
    Json,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use crate::services::DeliveryError;

/// Errors detected while reading or validating configuration.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid configuration: {0}")]
    Invalid(String),

    #[error("missing configuration: `{0}` should be set")]
    Missing(&'static str),
}

/// Central application error type for request handlers.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("bad request: {0}")]
    BadRequest(&'static str),

    #[error("rate limited, retry after {retry_after:?}")]
    RateLimited { retry_after: Duration },

    #[error("delivery failed")]
    Delivery(#[from] DeliveryError),

    #[error("internal server error")]
    Internal,
}

#[derive(Serialize)]
struct ErrorBody {
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let AppError::Delivery(e) = &self {
            error!(error = %e, "Verification code delivery failed");
        }

        let (status, message, retry_after) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.to_string(), None),
            AppError::RateLimited { retry_after } => {
                // Round up so a client waiting the advertised time is admitted.
                let secs = retry_after.as_secs() + u64::from(retry_after.subsec_nanos() > 0);
                (
                    StatusCode::TOO_MANY_REQUESTS,
                    format!("Rate limit exceeded. Try again in {secs} seconds."),
                    Some(secs),
                )
            }
            AppError::Delivery(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to send verification code".to_string(),
                None,
            ),
            AppError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
                None,
            ),
        };

        let mut response = (status, Json(ErrorBody { message })).into_response();
        if let Some(secs) = retry_after {
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, HeaderValue::from(secs));
        }
        response
    }
}

/// Convenience Result type alias that uses AppError as the error type.
pub type AppResult<T> = Result<T, AppError>;
