//! OAuth Login Use Case
//!
//! One algorithm serves every provider: match on the provider-side ID first,
//! fall back to matching (and linking) by email, and finally create a fresh
//! social-only account.

use std::sync::Arc;

use crate::application::claims::SessionClaims;
use crate::application::config::AuthConfig;
use crate::domain::entity::identity::Identity;
use crate::domain::repository::IdentityRepository;
use crate::domain::value_object::provider::OAuthProfile;
use crate::error::AuthResult;
use platform::token::TokenService;

/// OAuth login output
pub struct OAuthLoginOutput {
    pub identity: Identity,
    /// Session token for cookie
    pub session_token: String,
    /// Whether an existing local account was linked on this login
    pub linked: bool,
    /// Whether a brand new account was created
    pub created: bool,
}

/// OAuth login use case
pub struct OAuthLoginUseCase<R>
where
    R: IdentityRepository,
{
    repo: Arc<R>,
    tokens: Arc<TokenService>,
    config: Arc<AuthConfig>,
}

impl<R> OAuthLoginUseCase<R>
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

    pub async fn execute(&self, profile: OAuthProfile) -> AuthResult<OAuthLoginOutput> {
        let (identity, linked, created) = self.resolve(&profile).await?;

        let claims = SessionClaims::new(identity.identity_id.to_string(), self.config.session_ttl);
        let session_token = self.tokens.issue(&claims)?;

        tracing::info!(
            identity_id = %identity.identity_id,
            provider = %profile.provider,
            linked,
            created,
            "identity logged in via provider"
        );

        Ok(OAuthLoginOutput {
            identity,
            session_token,
            linked,
            created,
        })
    }

    /// Returns the resolved identity plus (linked, created) flags.
    async fn resolve(&self, profile: &OAuthProfile) -> AuthResult<(Identity, bool, bool)> {
        if let Some(identity) = self
            .repo
            .find_by_provider_id(profile.provider, &profile.provider_user_id)
            .await?
        {
            return Ok((identity, false, false));
        }

        if let Some(mut identity) = self.repo.find_by_email(&profile.email).await? {
            identity.link_provider(profile.provider, profile.provider_user_id.clone());
            if identity.thumbnail.is_none() {
                identity.thumbnail = profile.avatar_url.clone();
            }
            self.repo.update(&identity).await?;
            return Ok((identity, true, false));
        }

        let identity = Identity::new_from_provider(profile);
        self.repo.create(&identity).await?;
        Ok((identity, false, true))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_object::{email::Email, provider::Provider};
    use crate::test_support::{new_config, new_tokens, seed_local, TestIdentityRepository};

    fn use_case(repo: Arc<TestIdentityRepository>) -> OAuthLoginUseCase<TestIdentityRepository> {
        OAuthLoginUseCase::new(repo, new_tokens(), new_config())
    }

    fn profile(provider: Provider, id: &str, email: &str) -> OAuthProfile {
        OAuthProfile {
            provider,
            provider_user_id: id.to_string(),
            email: Email::new(email).unwrap(),
            display_name: Some("Ada Lovelace".to_string()),
            avatar_url: Some("https://cdn.example.com/a.png".to_string()),
        }
    }

    #[tokio::test]
    async fn test_creates_account_for_unknown_profile() {
        let repo = Arc::new(TestIdentityRepository::default());
        let output = use_case(repo.clone())
            .execute(profile(Provider::Google, "g-1", "ada@example.com"))
            .await
            .unwrap();

        assert!(output.created);
        assert!(!output.linked);
        assert!(!output.identity.has_password());
        let found = repo
            .find_by_provider_id(Provider::Google, "g-1")
            .await
            .unwrap();
        assert!(found.is_some());
    }

    #[tokio::test]
    async fn test_links_existing_local_account_by_email() {
        let repo = Arc::new(TestIdentityRepository::default());
        let existing = seed_local(&repo, "ada@example.com", "Str0ng#Pass").await;

        let output = use_case(repo.clone())
            .execute(profile(Provider::Twitter, "t-9", "ada@example.com"))
            .await
            .unwrap();

        assert!(output.linked);
        assert!(!output.created);
        assert_eq!(output.identity.identity_id, existing.identity_id);
        assert_eq!(output.identity.twitter_id.as_deref(), Some("t-9"));
        // Local password survives linking
        assert!(output.identity.has_password());
    }

    #[tokio::test]
    async fn test_repeat_login_matches_provider_id() {
        let repo = Arc::new(TestIdentityRepository::default());
        let uc = use_case(repo);

        let first = uc
            .execute(profile(Provider::Google, "g-1", "ada@example.com"))
            .await
            .unwrap();
        let second = uc
            .execute(profile(Provider::Google, "g-1", "ada@example.com"))
            .await
            .unwrap();

        assert!(!second.created);
        assert!(!second.linked);
        assert_eq!(first.identity.identity_id, second.identity.identity_id);
    }
}
