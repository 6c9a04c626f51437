//! Bearer token claims
//!
//! Two token kinds flow through the same cookie: a session token carrying the
//! identity ID, and a short-lived reset token carrying only the email of the
//! account mid password-reset. The scope keeps them from being interchangeable.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// What a bearer token is good for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenScope {
    Session,
    PasswordReset,
}

/// Claims of a logged-in session token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Identity ID as a UUID string
    pub sub: String,
    pub scope: TokenScope,
    pub iat: i64,
    pub exp: i64,
}

impl SessionClaims {
    pub fn new(identity_id: impl Into<String>, ttl: Duration) -> Self {
        let now = Utc::now().timestamp();
        Self {
            sub: identity_id.into(),
            scope: TokenScope::Session,
            iat: now,
            exp: now + ttl.as_secs() as i64,
        }
    }
}

/// Claims of a password-reset token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResetClaims {
    /// Email of the account being reset
    pub email: String,
    pub scope: TokenScope,
    pub iat: i64,
    pub exp: i64,
}

impl ResetClaims {
    pub fn new(email: impl Into<String>, ttl: Duration) -> Self {
        let now = Utc::now().timestamp();
        Self {
            email: email.into(),
            scope: TokenScope::PasswordReset,
            iat: now,
            exp: now + ttl.as_secs() as i64,
        }
    }
}
