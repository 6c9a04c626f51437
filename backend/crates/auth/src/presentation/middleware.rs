//! Auth Middleware
//!
//! The single bearer gate, parameterized by token scope. The session variant
//! resolves the full identity; the reset variant only carries the email the
//! reset token was issued for.

use axum::body::Body;
use axum::extract::State;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use std::sync::Arc;

use crate::application::claims::{ResetClaims, SessionClaims, TokenScope};
use crate::application::config::AuthConfig;
use crate::domain::entity::identity::Identity;
use crate::domain::repository::IdentityRepository;
use crate::domain::value_object::identity_id::IdentityId;
use crate::error::AuthError;
use platform::token::{TokenError, TokenService};

/// Middleware state
#[derive(Clone)]
pub struct AuthGateState<R>
where
    R: IdentityRepository + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub tokens: Arc<TokenService>,
    pub config: Arc<AuthConfig>,
}

/// Identity resolved by the session gate, stored in request extensions
#[derive(Clone)]
pub struct CurrentIdentity(pub Identity);

/// Email carried by a verified reset-scoped token
#[derive(Clone)]
pub struct ResetSubject(pub String);

/// Middleware that requires a valid session token
pub async fn require_session<R>(
    State(state): State<AuthGateState<R>>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, Response>
where
    R: IdentityRepository + Clone + Send + Sync + 'static,
{
    let token = bearer_token(&req, &state.config).map_err(|e| e.into_response())?;

    let claims: SessionClaims = state
        .tokens
        .verify(&token)
        .map_err(|e| token_error(e).into_response())?;

    if claims.scope != TokenScope::Session {
        return Err(AuthError::TokenInvalid.into_response());
    }

    let identity_id: IdentityId = claims
        .sub
        .parse()
        .map_err(|_| AuthError::TokenInvalid.into_response())?;

    let identity = state
        .repo
        .find_by_id(&identity_id)
        .await
        .map_err(|e| e.into_response())?
        // Token outlived the account
        .ok_or_else(|| AuthError::UserNotFound.into_response())?;

    req.extensions_mut().insert(CurrentIdentity(identity));
    Ok(next.run(req).await)
}

/// Middleware that requires a valid reset-scoped token
pub async fn require_reset_scope<R>(
    State(state): State<AuthGateState<R>>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, Response>
where
    R: IdentityRepository + Clone + Send + Sync + 'static,
{
    let token = bearer_token(&req, &state.config).map_err(|e| e.into_response())?;

    let claims: ResetClaims = state
        .tokens
        .verify(&token)
        .map_err(|e| token_error(e).into_response())?;

    if claims.scope != TokenScope::PasswordReset {
        return Err(AuthError::TokenInvalid.into_response());
    }

    req.extensions_mut().insert(ResetSubject(claims.email));
    Ok(next.run(req).await)
}

fn bearer_token(req: &Request<Body>, config: &AuthConfig) -> Result<String, AuthError> {
    platform::cookie::extract_cookie(req.headers(), &config.cookie.name)
        .ok_or(AuthError::TokenMissing)
}

fn token_error(e: TokenError) -> AuthError {
    match e {
        TokenError::Expired => AuthError::AuthenticationFailed,
        _ => AuthError::TokenInvalid,
    }
}
