//! Identity Entity
//!
//! An account as the authentication layer sees it: profile fields, the local
//! password digest (absent for social-only accounts), linked provider IDs,
//! and the state of an in-flight password reset.

use chrono::{DateTime, Duration, Utc};

use crate::domain::value_object::{
    email::Email,
    identity_id::IdentityId,
    password::{RawPassword, StoredPassword},
    provider::{OAuthProfile, Provider},
};
use crate::error::AuthError;
use platform::otp;

/// How long a reset OTP stays redeemable
pub const OTP_TTL_MINUTES: i64 = 15;

/// Identity entity
#[derive(Debug, Clone)]
pub struct Identity {
    /// Internal UUID identifier
    pub identity_id: IdentityId,
    /// Display name (first, last)
    pub first_name: String,
    pub last_name: String,
    /// Normalized, unique email
    pub email: Email,
    /// Argon2id digest, absent for social-only accounts
    pub password: Option<StoredPassword>,
    /// Linked provider-side user IDs
    pub google_id: Option<String>,
    pub twitter_id: Option<String>,
    /// Profile picture URL
    pub thumbnail: Option<String>,
    /// Blob-store handle for the uploaded picture; absent when the
    /// thumbnail came from a provider profile
    pub thumbnail_object_id: Option<String>,
    /// Free-form location string
    pub location: Option<String>,
    /// In-flight password reset state
    pub reset_otp: Option<String>,
    pub reset_otp_expires_at: Option<DateTime<Utc>>,
    /// Set by OTP verification; consumed by the reset itself
    pub reset_verified: bool,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
    /// Updated timestamp
    pub updated_at: DateTime<Utc>,
}

impl Identity {
    /// Create a new local account with a hashed password.
    pub fn new_local(
        first_name: String,
        last_name: String,
        email: Email,
        password: &RawPassword,
    ) -> Result<Self, AuthError> {
        let now = Utc::now();
        Ok(Self {
            identity_id: IdentityId::new(),
            first_name,
            last_name,
            email,
            password: Some(password.hash()?),
            google_id: None,
            twitter_id: None,
            thumbnail: None,
            thumbnail_object_id: None,
            location: None,
            reset_otp: None,
            reset_otp_expires_at: None,
            reset_verified: false,
            created_at: now,
            updated_at: now,
        })
    }

    /// Create a new account from an external provider profile (no password).
    pub fn new_from_provider(profile: &OAuthProfile) -> Self {
        let now = Utc::now();
        let (first_name, last_name) = split_display_name(profile.display_name.as_deref());

        let mut identity = Self {
            identity_id: IdentityId::new(),
            first_name,
            last_name,
            email: profile.email.clone(),
            password: None,
            google_id: None,
            twitter_id: None,
            thumbnail: profile.avatar_url.clone(),
            thumbnail_object_id: None,
            location: None,
            reset_otp: None,
            reset_otp_expires_at: None,
            reset_verified: false,
            created_at: now,
            updated_at: now,
        };
        identity.link_provider(profile.provider, profile.provider_user_id.clone());
        identity
    }

    /// Whether a local password has been set.
    pub fn has_password(&self) -> bool {
        self.password.is_some()
    }

    /// Verify a clear-text candidate against the stored digest.
    ///
    /// Accounts without a local password never verify.
    pub fn verify_password(&self, candidate: &RawPassword) -> bool {
        match &self.password {
            Some(stored) => stored.verify(candidate),
            None => false,
        }
    }

    /// Replace (or set for the first time) the local password.
    ///
    /// Any in-flight reset is discarded so a previously issued OTP cannot
    /// be redeemed against the new credential.
    pub fn set_password(&mut self, password: &RawPassword) -> Result<(), AuthError> {
        self.password = Some(password.hash()?);
        self.clear_reset_state();
        Ok(())
    }

    /// Point the profile picture at a freshly uploaded object, returning
    /// the previous object handle so the caller can clean it up.
    pub fn set_thumbnail(&mut self, url: String, object_id: String) -> Option<String> {
        let old = self.thumbnail_object_id.replace(object_id);
        self.thumbnail = Some(url);
        self.updated_at = Utc::now();
        old
    }

    /// The linked provider-side ID for a provider, if any.
    pub fn provider_id(&self, provider: Provider) -> Option<&str> {
        match provider {
            Provider::Google => self.google_id.as_deref(),
            Provider::Twitter => self.twitter_id.as_deref(),
        }
    }

    /// Attach a provider-side user ID to this account.
    pub fn link_provider(&mut self, provider: Provider, provider_user_id: String) {
        match provider {
            Provider::Google => self.google_id = Some(provider_user_id),
            Provider::Twitter => self.twitter_id = Some(provider_user_id),
        }
        self.updated_at = Utc::now();
    }

    /// Start a password reset: generate a fresh OTP with a 15-minute window.
    ///
    /// Any previous OTP and verification state is discarded.
    pub fn begin_reset(&mut self) -> String {
        let code = otp::generate_code();
        self.reset_otp = Some(code.clone());
        self.reset_otp_expires_at = Some(Utc::now() + Duration::minutes(OTP_TTL_MINUTES));
        self.reset_verified = false;
        self.updated_at = Utc::now();
        code
    }

    /// Check a submitted OTP. On success the code is consumed and the
    /// identity is marked reset-verified.
    pub fn verify_reset_otp(&mut self, submitted: &str) -> Result<(), AuthError> {
        let (code, expires_at) = match (&self.reset_otp, self.reset_otp_expires_at) {
            (Some(code), Some(expires_at)) => (code, expires_at),
            _ => return Err(AuthError::InvalidOtp),
        };

        if Utc::now() > expires_at {
            self.clear_reset_state();
            return Err(AuthError::OtpExpired);
        }

        if !otp::codes_match(code, submitted) {
            return Err(AuthError::InvalidOtp);
        }

        self.reset_otp = None;
        self.reset_otp_expires_at = None;
        self.reset_verified = true;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Complete a verified reset with a new password. Requires a prior
    /// successful OTP verification; the verified flag is consumed.
    pub fn complete_reset(&mut self, password: &RawPassword) -> Result<(), AuthError> {
        if !self.reset_verified {
            return Err(AuthError::OtpNotVerified);
        }
        self.password = Some(password.hash()?);
        self.clear_reset_state();
        Ok(())
    }

    fn clear_reset_state(&mut self) {
        self.reset_otp = None;
        self.reset_otp_expires_at = None;
        self.reset_verified = false;
        self.updated_at = Utc::now();
    }

    /// Full display name
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

fn split_display_name(display_name: Option<&str>) -> (String, String) {
    match display_name {
        Some(name) => match name.trim().split_once(' ') {
            Some((first, last)) => (first.to_string(), last.trim().to_string()),
            None => (name.trim().to_string(), String::new()),
        },
        None => (String::new(), String::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn local_identity() -> Identity {
        let password = RawPassword::new("Str0ng#Pass").unwrap();
        Identity::new_local(
            "Ada".to_string(),
            "Lovelace".to_string(),
            Email::new("ada@example.com").unwrap(),
            &password,
        )
        .unwrap()
    }

    #[test]
    fn test_local_account_verifies_own_password() {
        let identity = local_identity();
        let good = RawPassword::new("Str0ng#Pass").unwrap();
        let bad = RawPassword::new("Wr0ng#Pass!").unwrap();
        assert!(identity.verify_password(&good));
        assert!(!identity.verify_password(&bad));
    }

    #[test]
    fn test_social_account_never_verifies() {
        let profile = OAuthProfile {
            provider: Provider::Google,
            provider_user_id: "g-123".to_string(),
            email: Email::new("ada@example.com").unwrap(),
            display_name: Some("Ada Lovelace".to_string()),
            avatar_url: None,
        };
        let identity = Identity::new_from_provider(&profile);
        assert!(!identity.has_password());
        assert_eq!(identity.google_id.as_deref(), Some("g-123"));
        assert_eq!(identity.first_name, "Ada");
        assert_eq!(identity.last_name, "Lovelace");

        let candidate = RawPassword::new("Str0ng#Pass").unwrap();
        assert!(!identity.verify_password(&candidate));
    }

    #[test]
    fn test_reset_flow_happy_path() {
        let mut identity = local_identity();
        let code = identity.begin_reset();
        assert!(identity.verify_reset_otp(&code).is_ok());
        assert!(identity.reset_verified);
        assert!(identity.reset_otp.is_none());

        let new_password = RawPassword::new("N3w#Passw0rd").unwrap();
        identity.complete_reset(&new_password).unwrap();
        assert!(!identity.reset_verified);
        assert!(identity.verify_password(&new_password));
    }

    #[test]
    fn test_reset_rejects_wrong_code() {
        let mut identity = local_identity();
        identity.begin_reset();
        assert!(matches!(
            identity.verify_reset_otp("000000"),
            Err(AuthError::InvalidOtp)
        ));
        // Code stays redeemable after a wrong guess
        assert!(identity.reset_otp.is_some());
    }

    #[test]
    fn test_reset_rejects_expired_code() {
        let mut identity = local_identity();
        let code = identity.begin_reset();
        identity.reset_otp_expires_at = Some(Utc::now() - Duration::minutes(1));
        assert!(matches!(
            identity.verify_reset_otp(&code),
            Err(AuthError::OtpExpired)
        ));
        assert!(identity.reset_otp.is_none());
    }

    #[test]
    fn test_complete_reset_requires_verification() {
        let mut identity = local_identity();
        identity.begin_reset();
        let new_password = RawPassword::new("N3w#Passw0rd").unwrap();
        assert!(matches!(
            identity.complete_reset(&new_password),
            Err(AuthError::OtpNotVerified)
        ));
    }

    #[test]
    fn test_set_password_discards_pending_reset() {
        let mut identity = local_identity();
        let code = identity.begin_reset();

        let new_password = RawPassword::new("N3w#Passw0rd").unwrap();
        identity.set_password(&new_password).unwrap();

        assert!(identity.reset_otp.is_none());
        assert!(identity.reset_otp_expires_at.is_none());
        assert!(!identity.reset_verified);
        assert!(matches!(
            identity.verify_reset_otp(&code),
            Err(AuthError::InvalidOtp)
        ));
    }

    #[test]
    fn test_link_provider() {
        let mut identity = local_identity();
        identity.link_provider(Provider::Twitter, "t-42".to_string());
        assert_eq!(identity.provider_id(Provider::Twitter), Some("t-42"));
        assert_eq!(identity.provider_id(Provider::Google), None);
    }
}
