//! # Application Constants
//!
//! Defaults for the verification throttle and its housekeeping. Each of them
//! can be overridden through the environment, see [`crate::config`].

use std::time::Duration;

/// Default minimum time between two codes for the same user and channel.
pub const DEFAULT_MIN_REISSUE_INTERVAL: Duration = Duration::from_secs(2500);

/// Default number of digits in a verification code.
pub const DEFAULT_CODE_LENGTH: usize = 6;

/// Longest code the guard will generate.
pub const MAX_CODE_LENGTH: usize = 32;

/// Default period of the background sweep that drops expired entries.
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Address the server binds to when `BIND_ADDR` is unset.
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8090";
