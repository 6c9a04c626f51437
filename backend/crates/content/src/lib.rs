//! Content Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, typed IDs, repository trait
//! - `application/` - Post, comment and reply use cases
//! - `infra/` - PostgreSQL implementation
//! - `presentation/` - HTTP handlers, DTOs, router
//!
//! ## Features
//! - Media posts with captions and a location feed
//! - One-level comment threads (comments and replies)
//! - Like toggles on posts, comments and replies
//! - Author-only edits and deletes

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

#[cfg(test)]
pub(crate) mod test_support;

// Re-exports for convenience
pub use error::{ContentError, ContentResult};
pub use infra::postgres::PgContentRepository;
pub use presentation::router::content_router;
