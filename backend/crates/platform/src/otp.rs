//! One-Time Password Codes
//!
//! Short-lived 6-digit numeric codes for password-reset verification.
//! Generation uses the OS RNG; comparison is constant-time so a stored code
//! cannot be probed byte by byte.

use rand::Rng;
use rand::rngs::OsRng;

/// Number of digits in a generated code
pub const OTP_DIGITS: usize = 6;

/// Generate a 6-digit numeric code
///
/// The range excludes leading zeros so the code always renders as exactly
/// six digits.
pub fn generate_code() -> String {
    OsRng.gen_range(100_000..=999_999u32).to_string()
}

/// Constant-time equality for submitted vs stored codes
pub fn codes_match(submitted: &str, stored: &str) -> bool {
    let a = submitted.as_bytes();
    let b = stored.as_bytes();

    if a.len() != b.len() {
        return false;
    }

    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_code_shape() {
        for _ in 0..100 {
            let code = generate_code();
            assert_eq!(code.len(), OTP_DIGITS);
            assert!(code.chars().all(|c| c.is_ascii_digit()));
            assert_ne!(code.chars().next(), Some('0'));
        }
    }

    #[test]
    fn test_codes_match() {
        assert!(codes_match("123456", "123456"));
        assert!(!codes_match("123456", "123457"));
        assert!(!codes_match("123456", "12345"));
        assert!(!codes_match("", "123456"));
    }
}
