//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors, but application-level
//! errors should use `kernel::error::AppError`.

use auth::{auth_router, AuthConfig, AuthDeps, HttpOAuthGateway, PgIdentityRepository, ProviderConfig};
use axum::{
    Router, http,
    http::{Method, header},
};
use base64::Engine;
use base64::engine::general_purpose;
use content::{content_router, PgContentRepository};
use platform::mailer::{HttpMailer, LogMailer, MailConfig, Mailer};
use platform::media::{HttpMediaStore, MediaConfig, MediaStore};
use platform::token::TokenService;
use sqlx::postgres::PgPoolOptions;
use std::env;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// Re-export unified error types for use in handlers
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "api=info,auth=info,content=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Database connection
    let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set in environment");

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await?;

    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("../../../database/migrations")
        .run(&pool)
        .await?;

    tracing::info!("Migrations completed");

    // Auth configuration
    let auth_config = if cfg!(debug_assertions) {
        let mut config = AuthConfig::development();
        config.oauth_redirect_base = env::var("OAUTH_REDIRECT_BASE")
            .unwrap_or_else(|_| "http://localhost:40922/home".to_string());
        config
    } else {
        // In production, load secret from environment
        let secret_b64 =
            env::var("TOKEN_SECRET").expect("TOKEN_SECRET must be set in production");
        let token_secret = Engine::decode(&general_purpose::STANDARD, &secret_b64)?;
        let oauth_redirect_base = env::var("OAUTH_REDIRECT_BASE")
            .expect("OAUTH_REDIRECT_BASE must be set in production");
        AuthConfig {
            token_secret,
            oauth_redirect_base,
            ..AuthConfig::default()
        }
    };

    let tokens = Arc::new(TokenService::new(&auth_config.token_secret));

    // Mail delivery: log-only unless the HTTP mail API is configured
    let mailer: Arc<dyn Mailer> = match env::var("MAIL_API_KEY") {
        Ok(api_key) => Arc::new(HttpMailer::new(MailConfig {
            endpoint: env::var("MAIL_API_URL")
                .unwrap_or_else(|_| "https://api.brevo.com/v3/smtp/email".to_string()),
            api_key,
            sender_email: env::var("MAIL_SENDER_EMAIL")
                .expect("MAIL_SENDER_EMAIL must be set when MAIL_API_KEY is set"),
            sender_name: env::var("MAIL_SENDER_NAME").ok(),
        })),
        Err(_) => {
            tracing::warn!("MAIL_API_KEY not set, OTP mails will only be logged");
            Arc::new(LogMailer)
        }
    };

    // Media uploads
    let media: Arc<dyn MediaStore> = Arc::new(HttpMediaStore::new(MediaConfig {
        upload_url: env::var("MEDIA_UPLOAD_URL")
            .expect("MEDIA_UPLOAD_URL must be set in environment"),
        destroy_url: env::var("MEDIA_DESTROY_URL")
            .expect("MEDIA_DESTROY_URL must be set in environment"),
        api_key: env::var("MEDIA_API_KEY").expect("MEDIA_API_KEY must be set in environment"),
    }));

    // OAuth providers: each one is optional, unconfigured providers 401
    let oauth = Arc::new(HttpOAuthGateway::new(
        provider_from_env("GOOGLE", ProviderConfig::google),
        provider_from_env("TWITTER", ProviderConfig::twitter),
    ));

    let identity_repo = Arc::new(PgIdentityRepository::new(pool.clone()));
    let content_repo = Arc::new(PgContentRepository::new(pool.clone()));
    let auth_config = Arc::new(auth_config);

    let gate = auth::middleware::AuthGateState {
        repo: identity_repo.clone(),
        tokens: tokens.clone(),
        config: auth_config.clone(),
    };

    let deps = AuthDeps {
        repo: identity_repo,
        config: auth_config,
        tokens,
        mailer,
        media: media.clone(),
        oauth,
    };

    // CORS configuration
    let frontend_origins = env::var("FRONTEND_ORIGINS")
        .unwrap_or_else(|_| "http://localhost:40922,http://127.0.0.1:40922".to_string());

    let allowed_origins: Vec<http::HeaderValue> = frontend_origins
        .split(',')
        .filter_map(|origin| origin.trim().parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
        ]))
        .allow_credentials(true);

    // Build router
    let app = Router::new()
        .nest(
            "/api/v1/users",
            auth_router(deps).merge(content_router(content_repo, media, gate)),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], 31113));
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

/// Read one OAuth provider's credentials from `{PREFIX}_CLIENT_ID`,
/// `{PREFIX}_CLIENT_SECRET` and `{PREFIX}_REDIRECT_URI`
fn provider_from_env(
    prefix: &str,
    build: fn(String, String, String) -> ProviderConfig,
) -> Option<ProviderConfig> {
    let client_id = env::var(format!("{prefix}_CLIENT_ID")).ok()?;
    let client_secret = env::var(format!("{prefix}_CLIENT_SECRET")).ok()?;
    let redirect_uri = env::var(format!("{prefix}_REDIRECT_URI")).ok()?;
    Some(build(client_id, client_secret, redirect_uri))
}
