//! Login Use Case
//!
//! Verifies local credentials and issues a session token. A wrong email and a
//! wrong password are indistinguishable to the caller.

use std::sync::Arc;

use crate::application::claims::SessionClaims;
use crate::application::config::AuthConfig;
use crate::domain::entity::identity::Identity;
use crate::domain::repository::IdentityRepository;
use crate::domain::value_object::{email::Email, password::RawPassword};
use crate::error::{AuthError, AuthResult};
use platform::token::TokenService;

/// Login input
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

/// Login output
#[derive(Debug)]
pub struct LoginOutput {
    pub identity: Identity,
    /// Session token for cookie
    pub session_token: String,
}

/// Login use case
pub struct LoginUseCase<R>
where
    R: IdentityRepository,
{
    repo: Arc<R>,
    tokens: Arc<TokenService>,
    config: Arc<AuthConfig>,
}

impl<R> LoginUseCase<R>
where
    R: IdentityRepository,
{
    pub fn new(repo: Arc<R>, tokens: Arc<TokenService>, config: Arc<AuthConfig>) -> Self {
        Self {
            repo,
            tokens,
            config,
        }
    }

    pub async fn execute(&self, input: LoginInput) -> AuthResult<LoginOutput> {
        let email = Email::new(&input.email).map_err(|_| AuthError::InvalidCredentials)?;
        let password =
            RawPassword::new(input.password).map_err(|_| AuthError::InvalidCredentials)?;

        let identity = self
            .repo
            .find_by_email(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !identity.verify_password(&password) {
            return Err(AuthError::InvalidCredentials);
        }

        let claims = SessionClaims::new(identity.identity_id.to_string(), self.config.session_ttl);
        let session_token = self.tokens.issue(&claims)?;

        tracing::info!(identity_id = %identity.identity_id, "identity logged in");

        Ok(LoginOutput {
            identity,
            session_token,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{new_config, new_tokens, seed_local, TestIdentityRepository};

    fn use_case(repo: Arc<TestIdentityRepository>) -> LoginUseCase<TestIdentityRepository> {
        LoginUseCase::new(repo, new_tokens(), new_config())
    }

    #[tokio::test]
    async fn test_login_with_valid_credentials() {
        let repo = Arc::new(TestIdentityRepository::default());
        seed_local(&repo, "ada@example.com", "Str0ng#Pass").await;

        let output = use_case(repo)
            .execute(LoginInput {
                email: "ada@example.com".to_string(),
                password: "Str0ng#Pass".to_string(),
            })
            .await
            .unwrap();
        assert!(!output.session_token.is_empty());
    }

    #[tokio::test]
    async fn test_login_wrong_password() {
        let repo = Arc::new(TestIdentityRepository::default());
        seed_local(&repo, "ada@example.com", "Str0ng#Pass").await;

        let err = use_case(repo)
            .execute(LoginInput {
                email: "ada@example.com".to_string(),
                password: "Wr0ng#Pass!".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_login_unknown_email_is_indistinguishable() {
        let repo = Arc::new(TestIdentityRepository::default());
        let err = use_case(repo)
            .execute(LoginInput {
                email: "ghost@example.com".to_string(),
                password: "Str0ng#Pass".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_login_social_only_account_fails() {
        let repo = Arc::new(TestIdentityRepository::default());
        crate::test_support::seed_social(&repo, "ada@example.com", "g-1").await;

        let err = use_case(repo)
            .execute(LoginInput {
                email: "ada@example.com".to_string(),
                password: "Str0ng#Pass".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
    }
}
