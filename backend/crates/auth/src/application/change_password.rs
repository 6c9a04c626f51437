//! Change Password Use Case
//!
//! Authenticated password change: the current password must verify first.
//! Also covers the first-time set for social-only accounts, which have no
//! current password to check.

use std::sync::Arc;

use crate::domain::repository::IdentityRepository;
use crate::domain::value_object::{identity_id::IdentityId, password::RawPassword};
use crate::error::{AuthError, AuthResult};

/// Change password use case
pub struct ChangePasswordUseCase<R>
where
    R: IdentityRepository,
{
    repo: Arc<R>,
}

impl<R> ChangePasswordUseCase<R>
where
    R: IdentityRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// Change an existing password, proving knowledge of the current one.
    pub async fn execute(
        &self,
        identity_id: &IdentityId,
        current_password: String,
        new_password: String,
    ) -> AuthResult<()> {
        let mut identity = self
            .repo
            .find_by_id(identity_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        let current =
            RawPassword::new(current_password).map_err(|_| AuthError::InvalidCredentials)?;
        if !identity.verify_password(&current) {
            return Err(AuthError::InvalidCredentials);
        }

        let new = RawPassword::new(new_password)?;
        identity.set_password(&new)?;
        self.repo.update(&identity).await?;

        tracing::info!(identity_id = %identity.identity_id, "password changed");
        Ok(())
    }

    /// First-time password set for a social-only account.
    ///
    /// Refused when a password already exists, to keep this path from
    /// becoming a verification bypass.
    pub async fn set_initial(
        &self,
        identity_id: &IdentityId,
        password: String,
    ) -> AuthResult<()> {
        let mut identity = self
            .repo
            .find_by_id(identity_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        if identity.has_password() {
            return Err(AuthError::Validation(
                "Password already set. Use change password instead".to_string(),
            ));
        }

        let password = RawPassword::new(password)?;
        identity.set_password(&password)?;
        self.repo.update(&identity).await?;

        tracing::info!(identity_id = %identity.identity_id, "initial password set");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{seed_local, seed_social, TestIdentityRepository};

    #[tokio::test]
    async fn test_change_with_correct_current() {
        let repo = Arc::new(TestIdentityRepository::default());
        let identity = seed_local(&repo, "ada@example.com", "Str0ng#Pass").await;

        ChangePasswordUseCase::new(repo.clone())
            .execute(
                &identity.identity_id,
                "Str0ng#Pass".to_string(),
                "N3w#Passw0rd".to_string(),
            )
            .await
            .unwrap();

        let stored = repo.find_by_id(&identity.identity_id).await.unwrap().unwrap();
        let new = RawPassword::new("N3w#Passw0rd").unwrap();
        assert!(stored.verify_password(&new));
    }

    #[tokio::test]
    async fn test_change_with_wrong_current() {
        let repo = Arc::new(TestIdentityRepository::default());
        let identity = seed_local(&repo, "ada@example.com", "Str0ng#Pass").await;

        let err = ChangePasswordUseCase::new(repo)
            .execute(
                &identity.identity_id,
                "Wr0ng#Pass!".to_string(),
                "N3w#Passw0rd".to_string(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_change_invalidates_pending_otp() {
        let repo = Arc::new(TestIdentityRepository::default());
        let mut identity = seed_local(&repo, "ada@example.com", "Str0ng#Pass").await;
        let code = identity.begin_reset();
        repo.update(&identity).await.unwrap();

        ChangePasswordUseCase::new(repo.clone())
            .execute(
                &identity.identity_id,
                "Str0ng#Pass".to_string(),
                "N3w#Passw0rd".to_string(),
            )
            .await
            .unwrap();

        let mut stored = repo.find_by_id(&identity.identity_id).await.unwrap().unwrap();
        assert!(stored.reset_otp.is_none());
        assert!(matches!(
            stored.verify_reset_otp(&code),
            Err(AuthError::InvalidOtp)
        ));
    }

    #[tokio::test]
    async fn test_set_initial_for_social_account() {
        let repo = Arc::new(TestIdentityRepository::default());
        let identity = seed_social(&repo, "ada@example.com", "g-1").await;

        ChangePasswordUseCase::new(repo.clone())
            .set_initial(&identity.identity_id, "Str0ng#Pass".to_string())
            .await
            .unwrap();

        let stored = repo.find_by_id(&identity.identity_id).await.unwrap().unwrap();
        assert!(stored.has_password());
    }

    #[tokio::test]
    async fn test_set_initial_refused_when_password_exists() {
        let repo = Arc::new(TestIdentityRepository::default());
        let identity = seed_local(&repo, "ada@example.com", "Str0ng#Pass").await;

        let err = ChangePasswordUseCase::new(repo)
            .set_initial(&identity.identity_id, "N3w#Passw0rd".to_string())
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Validation(_)));
    }
}
