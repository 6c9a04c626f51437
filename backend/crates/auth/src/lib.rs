//! Auth (Authentication) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Business logic, entities, repository traits
//! - `application/` - Use cases and application services
//! - `infra/` - Database implementations and provider gateways
//! - `presentation/` - HTTP handlers, DTOs, middleware, router
//!
//! ## Features
//! - Local signup/signin with email + password
//! - OAuth login (Google, X/Twitter) with account linking by email
//! - OTP-based password reset over email
//! - Stateless bearer tokens carried in an HttpOnly cookie
//!
//! ## Security Model
//! - Passwords hashed with Argon2id
//! - Session and reset tokens are scoped and cannot stand in for each other
//! - Reset completion requires a prior OTP verification in the same window
//! - Unknown emails get the same reset answer as known ones

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

#[cfg(any(test, feature = "test-util"))]
pub mod test_support;

// Re-exports for convenience
pub use application::config::AuthConfig;
pub use error::{AuthError, AuthResult};
pub use infra::oauth::{HttpOAuthGateway, OAuthGateway, ProviderConfig};
pub use infra::postgres::PgIdentityRepository;
pub use presentation::router::{auth_router, AuthDeps};

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

pub mod middleware {
    pub use crate::presentation::middleware::*;
}
