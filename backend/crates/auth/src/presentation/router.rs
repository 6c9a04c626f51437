//! Auth Router

use axum::middleware::from_fn_with_state;
use axum::{
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::domain::repository::IdentityRepository;
use crate::infra::oauth::OAuthGateway;
use crate::presentation::handlers::{self, AuthAppState};
use crate::presentation::middleware::{self, AuthGateState};
use platform::mailer::Mailer;
use platform::media::MediaStore;
use platform::token::TokenService;

/// Everything the auth router needs wired in
pub struct AuthDeps<R>
where
    R: IdentityRepository + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub config: Arc<AuthConfig>,
    pub tokens: Arc<TokenService>,
    pub mailer: Arc<dyn Mailer>,
    pub media: Arc<dyn MediaStore>,
    pub oauth: Arc<dyn OAuthGateway>,
}

/// Create the auth router for any repository implementation
pub fn auth_router<R>(deps: AuthDeps<R>) -> Router
where
    R: IdentityRepository + Clone + Send + Sync + 'static,
{
    let gate = AuthGateState {
        repo: deps.repo.clone(),
        tokens: deps.tokens.clone(),
        config: deps.config.clone(),
    };

    let state = AuthAppState {
        repo: deps.repo,
        config: deps.config,
        tokens: deps.tokens,
        mailer: deps.mailer,
        media: deps.media,
        oauth: deps.oauth,
    };

    let public = Router::new()
        .route("/create-form", post(handlers::register::<R>))
        .route("/sign-in-user", post(handlers::login::<R>))
        .route("/logout", get(handlers::logout::<R>))
        .route("/password-reset-otp", post(handlers::request_otp::<R>))
        .route("/auth/{provider}", get(handlers::oauth_start::<R>))
        .route(
            "/auth/{provider}/callback",
            get(handlers::oauth_callback::<R>),
        );

    let session_protected = Router::new()
        .route("/get-user-by-id/{id}", get(handlers::get_by_id::<R>))
        .route("/get-user-by-name/{name}", get(handlers::get_by_name::<R>))
        .route("/update-user", put(handlers::update_user::<R>))
        .route("/delete-user", delete(handlers::delete_user::<R>))
        .route("/set-password", post(handlers::set_password::<R>))
        .route("/change-password", post(handlers::change_password::<R>))
        .layer(from_fn_with_state(
            gate.clone(),
            middleware::require_session::<R>,
        ));

    let reset_protected = Router::new()
        .route("/verify-otp", post(handlers::verify_otp::<R>))
        .route("/reset-password", post(handlers::reset_password::<R>))
        .layer(from_fn_with_state(
            gate,
            middleware::require_reset_scope::<R>,
        ));

    public
        .merge(session_protected)
        .merge(reset_protected)
        .with_state(state)
}
