//! # Services
//!
//! Outbound delivery of verification codes and the background sweep of the
//! throttle.
//!
//! ## Available Services
//!
//! - **Email** (`email`) - Email delivery with a logging and an HTTP API implementation
//! - **SMS** (`sms`) - SMS delivery with a logging and an HTTP gateway implementation
//! - **Sweeper** (`sweeper`) - Periodic eviction of expired throttle entries

use thiserror::Error;

pub mod email;
pub mod sms;
pub mod sweeper;

/// Errors that can occur while handing a message to a delivery provider
#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("Failed to send message: {0}")]
    SendFailed(String),
}
