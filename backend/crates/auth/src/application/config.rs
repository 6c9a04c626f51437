//! Application Configuration
//!
//! Configuration for the Auth application layer.

use std::time::Duration;

pub use platform::cookie::{CookieConfig, SameSite};

/// Auth application configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Token signing secret
    pub token_secret: Vec<u8>,
    /// Session token lifetime (3 days)
    pub session_ttl: Duration,
    /// Password-reset token lifetime (15 minutes)
    pub reset_ttl: Duration,
    /// Bearer cookie settings
    pub cookie: CookieConfig,
    /// URL the client lands on after a provider round trip
    pub oauth_redirect_base: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            token_secret: Vec::new(),
            session_ttl: Duration::from_secs(3 * 24 * 3600),
            reset_ttl: Duration::from_secs(15 * 60),
            cookie: CookieConfig::default(),
            oauth_redirect_base: String::new(),
        }
    }
}

impl AuthConfig {
    /// Create config with a random token secret (for development)
    pub fn with_random_secret() -> Self {
        use rand::RngCore;
        let mut secret = vec![0u8; 32];
        rand::rngs::OsRng.fill_bytes(&mut secret);
        Self {
            token_secret: secret,
            ..Default::default()
        }
    }

    /// Create config for development (insecure cookie)
    pub fn development() -> Self {
        let mut config = Self::with_random_secret();
        config.cookie.secure = false;
        config
    }

    /// Session TTL in whole seconds
    pub fn session_ttl_secs(&self) -> i64 {
        self.session_ttl.as_secs() as i64
    }

    /// Reset TTL in whole seconds
    pub fn reset_ttl_secs(&self) -> i64 {
        self.reset_ttl.as_secs() as i64
    }
}
