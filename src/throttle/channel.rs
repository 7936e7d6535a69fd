//! # Verification Channels
//!
//! Every verification purpose is throttled on its own. The set is closed and
//! known at compile time, so stores can be addressed by a dense index instead
//! of a lookup table.

use serde::{Deserialize, Serialize};

/// Transport a channel's codes travel over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Medium {
    Sms,
    Email,
}

/// Identifies the purpose a verification code is issued for.
///
/// Adding a variant requires extending [`ChannelType::ALL`]; the guard sizes
/// its stores from that array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelType {
    /// Login code sent by SMS
    SmsLogin,
    /// Login code sent by email
    EmailLogin,
    /// Password reset code, delivered by email
    PasswordReset,
}

impl ChannelType {
    /// Every channel, ordered by [`ChannelType::index`].
    pub const ALL: [ChannelType; 3] = [
        ChannelType::SmsLogin,
        ChannelType::EmailLogin,
        ChannelType::PasswordReset,
    ];

    /// Number of channels, i.e. the number of stores a guard owns.
    pub const COUNT: usize = Self::ALL.len();

    /// Position of this channel in [`ChannelType::ALL`].
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            ChannelType::SmsLogin => 0,
            ChannelType::EmailLogin => 1,
            ChannelType::PasswordReset => 2,
        }
    }

    #[inline]
    pub const fn medium(self) -> Medium {
        match self {
            ChannelType::SmsLogin => Medium::Sms,
            ChannelType::EmailLogin | ChannelType::PasswordReset => Medium::Email,
        }
    }

    /// Subject line used when the code goes out by email.
    pub const fn subject(self) -> &'static str {
        match self {
            ChannelType::SmsLogin | ChannelType::EmailLogin => "Login verification",
            ChannelType::PasswordReset => "Password reset",
        }
    }
}

impl std::fmt::Display for ChannelType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ChannelType::SmsLogin => "sms_login",
            ChannelType::EmailLogin => "email_login",
            ChannelType::PasswordReset => "password_reset",
        };
        write!(f, "{name}")
    }
}
