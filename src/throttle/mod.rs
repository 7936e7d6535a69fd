//! # Verification Throttle
//!
//! In-process bookkeeping for one-time verification codes. For every
//! (channel, user) pair it remembers the last code and when it was issued,
//! refuses a new issuance until the re-issue interval has passed, answers
//! "which code is live" for verification, and sweeps entries whose validity
//! window has elapsed.
//!
//! The guard only decides; sending the code is the caller's business:
//!
//! ```
//! use edgex_admin::throttle::{ChannelType, ThrottleGuard};
//!
//! let guard = ThrottleGuard::default();
//! let code = guard.generate_code();
//! if guard.try_reserve(ChannelType::SmsLogin, 42, &code) {
//!     // deliver `code`
//! }
//! assert!(guard.verify_code(ChannelType::SmsLogin, 42, &code));
//! ```

mod channel;
mod code;
mod config;
mod guard;
mod store;

pub use channel::{ChannelType, Medium};
pub use code::generate_code;
pub use config::ThrottleConfig;
pub(crate) use config::env_secs;
pub use guard::{Reservation, ThrottleGuard};
pub use store::{ChannelStore, ThrottleEntry};

/// Identity of the subject being throttled. Existence is not checked here.
pub type UserId = u64;
