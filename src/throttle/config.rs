use std::env;
use std::time::Duration;

use crate::error::ConfigError;
use crate::utils::constant::{DEFAULT_CODE_LENGTH, DEFAULT_MIN_REISSUE_INTERVAL, MAX_CODE_LENGTH};

/// Policy knobs of a [`ThrottleGuard`](super::ThrottleGuard).
///
/// The anti-reissue interval and the code validity window are separate
/// policies; unless configured otherwise the window equals the interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThrottleConfig {
    min_reissue_interval: Duration,
    code_validity_window: Duration,
    code_length: usize,
}

impl Default for ThrottleConfig {
    fn default() -> Self {
        Self {
            min_reissue_interval: DEFAULT_MIN_REISSUE_INTERVAL,
            code_validity_window: DEFAULT_MIN_REISSUE_INTERVAL,
            code_length: DEFAULT_CODE_LENGTH,
        }
    }
}

impl ThrottleConfig {
    /// Builds a validated configuration.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Invalid`] if either duration is zero or `code_length`
    /// is not in `1..=MAX_CODE_LENGTH`.
    pub fn new(
        min_reissue_interval: Duration,
        code_validity_window: Duration,
        code_length: usize,
    ) -> Result<Self, ConfigError> {
        let config = Self {
            min_reissue_interval,
            code_validity_window,
            code_length,
        };
        config.validate()?;
        Ok(config)
    }

    /// Same interval for throttling and validity, as the legacy behaviour had.
    pub fn with_interval(min_reissue_interval: Duration) -> Result<Self, ConfigError> {
        Self::new(min_reissue_interval, min_reissue_interval, DEFAULT_CODE_LENGTH)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_reissue_interval.is_zero() {
            return Err(ConfigError::Invalid(
                "minimum re-issue interval must be positive".to_string(),
            ));
        }
        if self.code_validity_window.is_zero() {
            return Err(ConfigError::Invalid(
                "code validity window must be positive".to_string(),
            ));
        }
        if self.code_length == 0 || self.code_length > MAX_CODE_LENGTH {
            return Err(ConfigError::Invalid(format!(
                "code length must be between 1 and {MAX_CODE_LENGTH}, got {}",
                self.code_length
            )));
        }
        Ok(())
    }

    /// Reads the throttle settings from the environment.
    ///
    /// # Environment Variables
    ///
    /// - `THROTTLE_MIN_REISSUE_SECS` - minimum seconds between two codes
    /// - `THROTTLE_CODE_VALIDITY_SECS` - seconds a code stays verifiable,
    ///   defaults to the re-issue interval
    /// - `THROTTLE_CODE_LENGTH` - digits per code
    pub fn from_env() -> Result<Self, ConfigError> {
        let min_reissue_interval = env_secs("THROTTLE_MIN_REISSUE_SECS")?
            .unwrap_or(DEFAULT_MIN_REISSUE_INTERVAL);
        let code_validity_window =
            env_secs("THROTTLE_CODE_VALIDITY_SECS")?.unwrap_or(min_reissue_interval);
        let code_length = env_parse::<usize>("THROTTLE_CODE_LENGTH")?.unwrap_or(DEFAULT_CODE_LENGTH);

        Self::new(min_reissue_interval, code_validity_window, code_length)
    }

    #[inline]
    pub fn min_reissue_interval(&self) -> Duration {
        self.min_reissue_interval
    }

    #[inline]
    pub fn code_validity_window(&self) -> Duration {
        self.code_validity_window
    }

    #[inline]
    pub fn code_length(&self) -> usize {
        self.code_length
    }
}

/// Parses an optional env variable; present but malformed is an error.
pub(crate) fn env_parse<T: std::str::FromStr>(name: &str) -> Result<Option<T>, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Invalid(format!("`{name}` has an unparsable value `{raw}`"))),
        Err(_) => Ok(None),
    }
}

pub(crate) fn env_secs(name: &str) -> Result<Option<Duration>, ConfigError> {
    Ok(env_parse::<u64>(name)?.map(Duration::from_secs))
}
