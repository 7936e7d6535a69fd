//! # HTTP Request Handlers
//!
//! ## Available Handlers
//!
//! - **Verification** (`verification`) - Issue and check one-time verification codes
//! - **Health Check** (`health_check`) - Application health monitoring

mod health_check;
mod verification;

pub use health_check::*;
pub use verification::*;
