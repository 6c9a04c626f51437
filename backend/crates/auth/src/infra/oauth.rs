//! OAuth Provider Gateway
//!
//! Talks to the providers' token and userinfo endpoints. The application
//! layer only ever sees the normalized `OAuthProfile`.

use async_trait::async_trait;
use serde::Deserialize;

use crate::domain::value_object::{
    email::Email,
    provider::{OAuthProfile, Provider},
};
use crate::error::{AuthError, AuthResult};

/// Per-provider OAuth endpoints and credentials
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub auth_url: String,
    pub token_url: String,
    pub userinfo_url: String,
    pub scopes: String,
}

impl ProviderConfig {
    /// Well-known Google endpoints
    pub fn google(client_id: String, client_secret: String, redirect_uri: String) -> Self {
        Self {
            client_id,
            client_secret,
            redirect_uri,
            auth_url: "https://accounts.google.com/o/oauth2/v2/auth".to_string(),
            token_url: "https://oauth2.googleapis.com/token".to_string(),
            userinfo_url: "https://www.googleapis.com/oauth2/v2/userinfo".to_string(),
            scopes: "openid email profile".to_string(),
        }
    }

    /// Well-known Twitter (X) endpoints
    pub fn twitter(client_id: String, client_secret: String, redirect_uri: String) -> Self {
        Self {
            client_id,
            client_secret,
            redirect_uri,
            auth_url: "https://twitter.com/i/oauth2/authorize".to_string(),
            token_url: "https://api.twitter.com/2/oauth2/token".to_string(),
            userinfo_url: "https://api.twitter.com/2/users/me?user.fields=profile_image_url,confirmed_email".to_string(),
            scopes: "users.read tweet.read users.email".to_string(),
        }
    }
}

/// Gateway to external login providers
#[async_trait]
pub trait OAuthGateway: Send + Sync {
    /// Build the browser redirect URL that starts the provider round trip
    fn authorize_url(&self, provider: Provider, state: &str) -> AuthResult<String>;

    /// Exchange an authorization code for a normalized profile
    async fn exchange(&self, provider: Provider, code: &str) -> AuthResult<OAuthProfile>;
}

/// HTTP gateway hitting the real provider endpoints
pub struct HttpOAuthGateway {
    client: reqwest::Client,
    google: Option<ProviderConfig>,
    twitter: Option<ProviderConfig>,
}

impl HttpOAuthGateway {
    pub fn new(google: Option<ProviderConfig>, twitter: Option<ProviderConfig>) -> Self {
        Self {
            client: reqwest::Client::new(),
            google,
            twitter,
        }
    }

    fn config_for(&self, provider: Provider) -> AuthResult<&ProviderConfig> {
        let config = match provider {
            Provider::Google => self.google.as_ref(),
            Provider::Twitter => self.twitter.as_ref(),
        };
        // An unconfigured provider reads the same as an unknown one
        config.ok_or_else(|| {
            tracing::warn!(%provider, "login attempted against unconfigured provider");
            AuthError::OAuthFailed
        })
    }

    async fn fetch_access_token(
        &self,
        config: &ProviderConfig,
        code: &str,
    ) -> AuthResult<String> {
        let params = [
            ("grant_type", "authorization_code"),
            ("code", code),
            ("client_id", &config.client_id),
            ("client_secret", &config.client_secret),
            ("redirect_uri", &config.redirect_uri),
        ];

        let response = self
            .client
            .post(&config.token_url)
            .form(&params)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, "token exchange request failed");
                AuthError::OAuthFailed
            })?;

        if !response.status().is_success() {
            tracing::warn!(status = %response.status(), "token endpoint rejected code");
            return Err(AuthError::OAuthFailed);
        }

        let token: TokenResponse = response.json().await.map_err(|_| AuthError::OAuthFailed)?;
        Ok(token.access_token)
    }
}

#[async_trait]
impl OAuthGateway for HttpOAuthGateway {
    fn authorize_url(&self, provider: Provider, state: &str) -> AuthResult<String> {
        let config = self.config_for(provider)?;
        Ok(format!(
            "{}?response_type=code&client_id={}&redirect_uri={}&scope={}&state={}",
            config.auth_url,
            urlencoding::encode(&config.client_id),
            urlencoding::encode(&config.redirect_uri),
            urlencoding::encode(&config.scopes),
            urlencoding::encode(state),
        ))
    }

    async fn exchange(&self, provider: Provider, code: &str) -> AuthResult<OAuthProfile> {
        let config = self.config_for(provider)?;
        let access_token = self.fetch_access_token(config, code).await?;

        let response = self
            .client
            .get(&config.userinfo_url)
            .bearer_auth(&access_token)
            .send()
            .await
            .map_err(|_| AuthError::OAuthFailed)?;

        if !response.status().is_success() {
            tracing::warn!(status = %response.status(), "userinfo endpoint rejected token");
            return Err(AuthError::OAuthFailed);
        }

        match provider {
            Provider::Google => {
                let info: GoogleUserInfo =
                    response.json().await.map_err(|_| AuthError::OAuthFailed)?;
                info.into_profile()
            }
            Provider::Twitter => {
                let info: TwitterUserResponse =
                    response.json().await.map_err(|_| AuthError::OAuthFailed)?;
                info.data.into_profile()
            }
        }
    }
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Deserialize)]
struct GoogleUserInfo {
    id: String,
    email: Option<String>,
    name: Option<String>,
    picture: Option<String>,
}

impl GoogleUserInfo {
    fn into_profile(self) -> AuthResult<OAuthProfile> {
        // An account can only be matched and linked through its email
        let email = self.email.ok_or(AuthError::OAuthFailed)?;
        Ok(OAuthProfile {
            provider: Provider::Google,
            provider_user_id: self.id,
            email: Email::new(email).map_err(|_| AuthError::OAuthFailed)?,
            display_name: self.name,
            avatar_url: self.picture,
        })
    }
}

#[derive(Deserialize)]
struct TwitterUserResponse {
    data: TwitterUserInfo,
}

#[derive(Deserialize)]
struct TwitterUserInfo {
    id: String,
    name: Option<String>,
    confirmed_email: Option<String>,
    profile_image_url: Option<String>,
}

impl TwitterUserInfo {
    fn into_profile(self) -> AuthResult<OAuthProfile> {
        let email = self.confirmed_email.ok_or(AuthError::OAuthFailed)?;
        Ok(OAuthProfile {
            provider: Provider::Twitter,
            provider_user_id: self.id,
            email: Email::new(email).map_err(|_| AuthError::OAuthFailed)?,
            display_name: self.name,
            avatar_url: self.profile_image_url,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gateway() -> HttpOAuthGateway {
        HttpOAuthGateway::new(
            Some(ProviderConfig::google(
                "client-id".to_string(),
                "secret".to_string(),
                "https://app.example.com/callback".to_string(),
            )),
            None,
        )
    }

    #[test]
    fn test_authorize_url_encodes_parameters() {
        let url = gateway()
            .authorize_url(Provider::Google, "state-123")
            .unwrap();
        assert!(url.starts_with("https://accounts.google.com/o/oauth2/v2/auth?"));
        assert!(url.contains("client_id=client-id"));
        assert!(url.contains("redirect_uri=https%3A%2F%2Fapp.example.com%2Fcallback"));
        assert!(url.contains("scope=openid%20email%20profile"));
        assert!(url.contains("state=state-123"));
    }

    #[test]
    fn test_unconfigured_provider_fails_authentication() {
        let err = gateway().authorize_url(Provider::Twitter, "s").unwrap_err();
        assert!(matches!(err, AuthError::OAuthFailed));
    }

    #[test]
    fn test_profile_requires_email() {
        let info = GoogleUserInfo {
            id: "g-1".to_string(),
            email: None,
            name: None,
            picture: None,
        };
        assert!(matches!(info.into_profile(), Err(AuthError::OAuthFailed)));
    }
}
