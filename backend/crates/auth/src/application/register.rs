//! Register Use Case
//!
//! Creates a local account and logs it straight in.

use std::sync::Arc;

use crate::application::claims::SessionClaims;
use crate::application::config::AuthConfig;
use crate::domain::entity::identity::Identity;
use crate::domain::repository::IdentityRepository;
use crate::domain::value_object::{email::Email, password::RawPassword};
use crate::error::{AuthError, AuthResult};
use platform::mailer::{Mail, Mailer};
use platform::media::MediaStore;
use platform::token::TokenService;

/// Register input
pub struct RegisterInput {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    /// Raw bytes of an optional profile picture
    pub thumbnail: Option<(String, Vec<u8>)>,
    pub location: Option<String>,
}

/// Register output
#[derive(Debug)]
pub struct RegisterOutput {
    pub identity: Identity,
    /// Session token for cookie
    pub session_token: String,
}

/// Register use case
pub struct RegisterUseCase<R>
where
    R: IdentityRepository,
{
    repo: Arc<R>,
    media: Arc<dyn MediaStore>,
    mailer: Arc<dyn Mailer>,
    tokens: Arc<TokenService>,
    config: Arc<AuthConfig>,
}

impl<R> RegisterUseCase<R>
where
    R: IdentityRepository,
{
    pub fn new(
        repo: Arc<R>,
        media: Arc<dyn MediaStore>,
        mailer: Arc<dyn Mailer>,
        tokens: Arc<TokenService>,
        config: Arc<AuthConfig>,
    ) -> Self {
        Self {
            repo,
            media,
            mailer,
            tokens,
            config,
        }
    }

    pub async fn execute(&self, input: RegisterInput) -> AuthResult<RegisterOutput> {
        if input.first_name.trim().is_empty() {
            return Err(AuthError::MissingField("firstName".to_string()));
        }
        if input.last_name.trim().is_empty() {
            return Err(AuthError::MissingField("lastName".to_string()));
        }

        let email = Email::new(&input.email)?;
        let password = RawPassword::new(input.password)?;

        // The unique index is the source of truth, but a pre-check gives the
        // common case a friendly error without burning an insert.
        if self.repo.find_by_email(&email).await?.is_some() {
            return Err(AuthError::EmailTaken);
        }

        let mut identity = Identity::new_local(
            input.first_name.trim().to_string(),
            input.last_name.trim().to_string(),
            email,
            &password,
        )?;
        identity.location = input.location;

        if let Some((filename, bytes)) = input.thumbnail {
            let object = self.media.upload(bytes, &filename).await?;
            identity.set_thumbnail(object.url, object.object_id);
        }

        self.repo.create(&identity).await?;

        // The account exists either way; a mail outage must not undo it
        if let Err(e) = self.mailer.send(welcome_mail(&identity)).await {
            tracing::warn!(error = %e, identity_id = %identity.identity_id, "welcome mail failed");
        }

        let claims = SessionClaims::new(identity.identity_id.to_string(), self.config.session_ttl);
        let session_token = self.tokens.issue(&claims)?;

        tracing::info!(identity_id = %identity.identity_id, "identity registered");

        Ok(RegisterOutput {
            identity,
            session_token,
        })
    }
}

fn welcome_mail(identity: &Identity) -> Mail {
    Mail {
        to: identity.email.as_str().to_string(),
        to_name: Some(identity.full_name()),
        subject: "🎉 Welcome to VeriCapture – No More Fake News for You!".to_string(),
        text: format!(
            "Hello {},\n\n\
             You're now officially part of VeriCapture, where only real-time, \
             verified content gets to shine and fake news gets kicked to the curb.\n\n\
             Capture & Share: spot something happening? Record live and upload.\n\
             Stay Ahead: get real-time updates on traffic, riots and accidents near you.\n\n\
             Welcome aboard!\n\
             The VeriCapture Team",
            identity.full_name()
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{
        new_config, new_tokens, NullMediaStore, RecordingMailer, TestIdentityRepository,
    };

    fn use_case(repo: Arc<TestIdentityRepository>) -> RegisterUseCase<TestIdentityRepository> {
        RegisterUseCase::new(
            repo,
            Arc::new(NullMediaStore),
            Arc::new(RecordingMailer::default()),
            new_tokens(),
            new_config(),
        )
    }

    fn input(email: &str) -> RegisterInput {
        RegisterInput {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: email.to_string(),
            password: "Str0ng#Pass".to_string(),
            thumbnail: None,
            location: None,
        }
    }

    #[tokio::test]
    async fn test_register_creates_identity_and_token() {
        let repo = Arc::new(TestIdentityRepository::default());
        let output = use_case(repo.clone()).execute(input("ada@example.com")).await.unwrap();

        assert!(!output.session_token.is_empty());
        let stored = repo
            .find_by_email(&Email::new("ada@example.com").unwrap())
            .await
            .unwrap();
        assert!(stored.is_some());
        assert!(stored.unwrap().has_password());
    }

    #[tokio::test]
    async fn test_register_sends_welcome_mail() {
        let repo = Arc::new(TestIdentityRepository::default());
        let mailer = Arc::new(RecordingMailer::default());
        let uc = RegisterUseCase::new(
            repo,
            Arc::new(NullMediaStore),
            mailer.clone(),
            new_tokens(),
            new_config(),
        );

        uc.execute(input("ada@example.com")).await.unwrap();

        let sent = mailer.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "ada@example.com");
        assert!(sent[0].subject.contains("Welcome to VeriCapture"));
    }

    #[tokio::test]
    async fn test_register_rejects_duplicate_email() {
        let repo = Arc::new(TestIdentityRepository::default());
        let uc = use_case(repo);
        uc.execute(input("ada@example.com")).await.unwrap();

        let err = uc.execute(input("ada@example.com")).await.unwrap_err();
        assert!(matches!(err, AuthError::EmailTaken));
    }

    #[tokio::test]
    async fn test_register_rejects_missing_name() {
        let repo = Arc::new(TestIdentityRepository::default());
        let mut bad = input("ada@example.com");
        bad.first_name = "  ".to_string();
        let err = use_case(repo).execute(bad).await.unwrap_err();
        assert!(matches!(err, AuthError::MissingField(_)));
    }

    #[tokio::test]
    async fn test_register_rejects_weak_password() {
        let repo = Arc::new(TestIdentityRepository::default());
        let mut bad = input("ada@example.com");
        bad.password = "weak".to_string();
        assert!(use_case(repo).execute(bad).await.is_err());
    }
}
