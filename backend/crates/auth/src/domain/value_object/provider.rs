//! External login provider value objects

use crate::domain::value_object::email::Email;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Supported external login providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Google,
    Twitter,
}

impl Provider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Google => "google",
            Provider::Twitter => "twitter",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Provider {
    type Err = UnknownProvider;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "google" => Ok(Provider::Google),
            "twitter" => Ok(Provider::Twitter),
            other => Err(UnknownProvider(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, thiserror::Error)]
#[error("unknown login provider: {0}")]
pub struct UnknownProvider(pub String);

/// Normalized profile returned by a provider after a successful exchange.
///
/// The provider-side user ID is the stable linking key; the email is required
/// so that an existing local account can be matched and linked.
#[derive(Debug, Clone)]
pub struct OAuthProfile {
    pub provider: Provider,
    pub provider_user_id: String,
    pub email: Email,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
}
