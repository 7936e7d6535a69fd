//! # Destination Validation
//!
//! Format checks for the address a verification code is delivered to. Which
//! check applies depends on the channel's [`Medium`].

use std::sync::LazyLock;

use regex::Regex;

use crate::throttle::Medium;

/// Plain email shape: local part, `@`, dotted domain.
pub static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9-]+(\.[a-zA-Z0-9-]+)+$")
        .expect("email regex is valid")
});

/// Phone number with an optional leading `+` and 6 to 15 digits.
///
/// # Examples
///
/// - `13612345678` ✓ Valid
/// - `+8613612345678` ✓ Valid
/// - `136-1234` ✗ Invalid
pub static PHONE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[0-9]{6,15}$").expect("phone regex is valid"));

/// Whether `destination` is a well-formed address for `medium`.
pub fn is_valid_destination(medium: Medium, destination: &str) -> bool {
    match medium {
        Medium::Email => EMAIL_REGEX.is_match(destination),
        Medium::Sms => PHONE_REGEX.is_match(destination),
    }
}

/// Whether `code` has the configured width and only decimal digits.
pub fn is_well_formed_code(code: &str, length: usize) -> bool {
    code.len() == length && code.bytes().all(|b| b.is_ascii_digit())
}
