//! Password value objects
//!
//! `RawPassword` is a policy-checked clear-text password that only lives long
//! enough to be hashed or verified. `StoredPassword` is the Argon2id digest
//! that actually persists.

use crate::error::AuthError;
use platform::password::{ClearTextPassword, PasswordDigest};

/// A clear-text password that has passed the strength policy.
#[derive(Debug)]
pub struct RawPassword(ClearTextPassword);

impl RawPassword {
    /// Validate the strength policy and wrap the clear-text password.
    pub fn new(raw: impl Into<String>) -> Result<Self, AuthError> {
        Ok(Self(ClearTextPassword::new(raw.into())?))
    }

    /// Hash into a storable digest.
    pub fn hash(&self) -> Result<StoredPassword, AuthError> {
        Ok(StoredPassword(self.0.hash()?))
    }
}

/// A persisted Argon2id password digest (PHC string format).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredPassword(PasswordDigest);

impl StoredPassword {
    /// Restore from a database value.
    pub fn from_db(phc: impl Into<String>) -> Result<Self, AuthError> {
        Ok(Self(PasswordDigest::from_phc_string(phc)?))
    }

    /// Verify a clear-text candidate against this digest.
    pub fn verify(&self, candidate: &RawPassword) -> bool {
        self.0.verify(&candidate.0)
    }

    /// PHC string for database storage.
    pub fn as_phc_string(&self) -> &str {
        self.0.as_phc_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_password_policy() {
        assert!(RawPassword::new("Str0ng#Pass").is_ok());
        assert!(RawPassword::new("short").is_err());
        assert!(RawPassword::new("alllowercase1#").is_err());
    }

    #[test]
    fn test_hash_and_verify() {
        let raw = RawPassword::new("Str0ng#Pass").unwrap();
        let stored = raw.hash().unwrap();
        assert!(stored.verify(&raw));

        let other = RawPassword::new("Wr0ng#Pass!").unwrap();
        assert!(!stored.verify(&other));
    }

    #[test]
    fn test_stored_roundtrip() {
        let raw = RawPassword::new("Str0ng#Pass").unwrap();
        let stored = raw.hash().unwrap();
        let restored = StoredPassword::from_db(stored.as_phc_string()).unwrap();
        assert!(restored.verify(&raw));
    }
}
