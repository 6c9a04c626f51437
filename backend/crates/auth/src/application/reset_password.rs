//! Reset Password Use Case
//!
//! Final step of the OTP flow. Only an identity whose OTP was verified in
//! this reset window may set a new password; the verified flag is consumed.

use std::sync::Arc;

use crate::domain::repository::IdentityRepository;
use crate::domain::value_object::{email::Email, password::RawPassword};
use crate::error::{AuthError, AuthResult};

/// Reset password use case
pub struct ResetPasswordUseCase<R>
where
    R: IdentityRepository,
{
    repo: Arc<R>,
}

impl<R> ResetPasswordUseCase<R>
where
    R: IdentityRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// `email` comes from the reset-scoped token, never from the request body.
    pub async fn execute(&self, email: &str, new_password: String) -> AuthResult<()> {
        let email = Email::new(email)?;
        let password = RawPassword::new(new_password)?;

        let mut identity = self
            .repo
            .find_by_email(&email)
            .await?
            .ok_or(AuthError::OtpNotVerified)?;

        identity.complete_reset(&password)?;
        self.repo.update(&identity).await?;

        tracing::info!(identity_id = %identity.identity_id, "password reset completed");
        Ok(())
    }
}
