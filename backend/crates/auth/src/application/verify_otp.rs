//! Verify OTP Use Case
//!
//! Checks the submitted code against the stored OTP. A successful check
//! consumes the code and marks the identity as allowed to complete the reset.

use std::sync::Arc;

use crate::domain::repository::IdentityRepository;
use crate::domain::value_object::email::Email;
use crate::error::{AuthError, AuthResult};

/// Verify OTP use case
pub struct VerifyOtpUseCase<R>
where
    R: IdentityRepository,
{
    repo: Arc<R>,
}

impl<R> VerifyOtpUseCase<R>
where
    R: IdentityRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// `email` comes from the reset-scoped token, never from the request body.
    pub async fn execute(&self, email: &str, submitted: &str) -> AuthResult<()> {
        let email = Email::new(email)?;

        let mut identity = self
            .repo
            .find_by_email(&email)
            .await?
            .ok_or(AuthError::InvalidOtp)?;

        let outcome = identity.verify_reset_otp(submitted);
        // Expiry clears state, success consumes the code; both must persist.
        self.repo.update(&identity).await?;
        outcome?;

        tracing::info!(identity_id = %identity.identity_id, "reset OTP verified");
        Ok(())
    }
}
