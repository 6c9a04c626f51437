//! Request Password Reset Use Case
//!
//! Generates an OTP, mails it, and issues a short-lived reset-scoped token.
//! The outcome is identical whether or not the email belongs to an account,
//! so the endpoint cannot be used to probe for registered addresses.

use std::sync::Arc;

use crate::application::claims::ResetClaims;
use crate::application::config::AuthConfig;
use crate::domain::repository::IdentityRepository;
use crate::domain::value_object::email::Email;
use crate::error::AuthResult;
use platform::mailer::{Mail, Mailer};
use platform::token::TokenService;

/// Request reset output
pub struct RequestResetOutput {
    /// Reset-scoped token for cookie (issued even for unknown emails)
    pub reset_token: String,
}

/// Request reset use case
pub struct RequestResetUseCase<R>
where
    R: IdentityRepository,
{
    repo: Arc<R>,
    mailer: Arc<dyn Mailer>,
    tokens: Arc<TokenService>,
    config: Arc<AuthConfig>,
}

impl<R> RequestResetUseCase<R>
where
    R: IdentityRepository,
{
    pub fn new(
        repo: Arc<R>,
        mailer: Arc<dyn Mailer>,
        tokens: Arc<TokenService>,
        config: Arc<AuthConfig>,
    ) -> Self {
        Self {
            repo,
            mailer,
            tokens,
            config,
        }
    }

    pub async fn execute(&self, email: String) -> AuthResult<RequestResetOutput> {
        let email = Email::new(email)?;

        if let Some(mut identity) = self.repo.find_by_email(&email).await? {
            let code = identity.begin_reset();
            self.repo.update(&identity).await?;

            let mail = Mail {
                to: identity.email.as_str().to_string(),
                to_name: Some(identity.full_name()),
                subject: "Your password reset code".to_string(),
                text: format!(
                    "Your one-time password reset code is {code}. \
                     It expires in 15 minutes."
                ),
            };
            self.mailer.send(mail).await?;

            tracing::info!(identity_id = %identity.identity_id, "reset OTP issued");
        } else {
            tracing::debug!("reset requested for unknown email");
        }

        let claims = ResetClaims::new(email.as_str(), self.config.reset_ttl);
        let reset_token = self.tokens.issue(&claims)?;

        Ok(RequestResetOutput { reset_token })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{new_config, new_tokens, seed_local, RecordingMailer, TestIdentityRepository};

    fn use_case(
        repo: Arc<TestIdentityRepository>,
        mailer: Arc<RecordingMailer>,
    ) -> RequestResetUseCase<TestIdentityRepository> {
        RequestResetUseCase::new(repo, mailer, new_tokens(), new_config())
    }

    #[tokio::test]
    async fn test_known_email_gets_mail_and_otp() {
        let repo = Arc::new(TestIdentityRepository::default());
        let mailer = Arc::new(RecordingMailer::default());
        seed_local(&repo, "ada@example.com", "Str0ng#Pass").await;

        let output = use_case(repo.clone(), mailer.clone())
            .execute("ada@example.com".to_string())
            .await
            .unwrap();

        assert!(!output.reset_token.is_empty());
        assert_eq!(mailer.sent().len(), 1);

        let stored = repo
            .find_by_email(&Email::new("ada@example.com").unwrap())
            .await
            .unwrap()
            .unwrap();
        assert!(stored.reset_otp.is_some());
        assert!(stored.reset_otp_expires_at.is_some());
        assert!(!stored.reset_verified);
    }

    #[tokio::test]
    async fn test_unknown_email_still_succeeds_without_mail() {
        let repo = Arc::new(TestIdentityRepository::default());
        let mailer = Arc::new(RecordingMailer::default());

        let output = use_case(repo, mailer.clone())
            .execute("ghost@example.com".to_string())
            .await
            .unwrap();

        assert!(!output.reset_token.is_empty());
        assert!(mailer.sent().is_empty());
    }
}
