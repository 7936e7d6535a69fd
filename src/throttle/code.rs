use rand::Rng;

/// Generates a decimal verification code of exactly `length` digits.
///
/// Each digit is drawn independently and uniformly from the thread-local
/// generator, which the OS seeds, so the code is zero-padded by construction
/// and independent of any earlier code. `length` is validated by
/// [`ThrottleConfig`](super::ThrottleConfig); zero yields an empty string.
pub fn generate_code(length: usize) -> String {
    let mut rng = rand::rng();
    (0..length)
        .map(|_| char::from(b'0' + rng.random_range(0..10u8)))
        .collect()
}
