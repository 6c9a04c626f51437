//! Content Error Types
//!
//! Content-specific error variants bridging into the unified
//! `kernel::error::AppError` response shape.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// Content-specific result type alias
pub type ContentResult<T> = Result<T, ContentError>;

/// Content-specific error variants
#[derive(Debug, Error)]
pub enum ContentError {
    /// Post record not found
    #[error("Post not found")]
    PostNotFound,

    /// Comment record not found
    #[error("Comment not found")]
    CommentNotFound,

    /// Reply record not found
    #[error("Reply not found")]
    ReplyNotFound,

    /// A page past the end of a list
    #[error("No more page available")]
    PageOutOfRange,

    /// Write attempted by someone other than the author
    #[error("You are not allowed to modify this content")]
    NotOwner,

    /// Missing required request field
    #[error("{0}")]
    MissingField(String),

    /// Request field failed validation
    #[error("{0}")]
    Validation(String),

    /// Blob store upload failed
    #[error("Media upload failed")]
    Upload(#[from] platform::media::MediaError),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ContentError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ContentError::PostNotFound
            | ContentError::CommentNotFound
            | ContentError::ReplyNotFound
            | ContentError::PageOutOfRange => StatusCode::NOT_FOUND,
            ContentError::NotOwner => StatusCode::FORBIDDEN,
            ContentError::MissingField(_) | ContentError::Validation(_) => StatusCode::BAD_REQUEST,
            ContentError::Upload(_) | ContentError::Database(_) | ContentError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            ContentError::PostNotFound
            | ContentError::CommentNotFound
            | ContentError::ReplyNotFound
            | ContentError::PageOutOfRange => ErrorKind::NotFound,
            ContentError::NotOwner => ErrorKind::Forbidden,
            ContentError::MissingField(_) | ContentError::Validation(_) => ErrorKind::BadRequest,
            ContentError::Upload(_) | ContentError::Database(_) | ContentError::Internal(_) => {
                ErrorKind::InternalServerError
            }
        }
    }

    fn log(&self) {
        match self {
            ContentError::Database(e) => {
                tracing::error!(error = %e, "Content database error");
            }
            ContentError::Upload(e) => {
                tracing::error!(error = %e, "Media upload error");
            }
            ContentError::Internal(msg) => {
                tracing::error!(message = %msg, "Content internal error");
            }
            ContentError::NotOwner => {
                tracing::warn!("Ownership check rejected a write");
            }
            _ => {
                tracing::debug!(error = %self, "Content error");
            }
        }
    }
}

impl IntoResponse for ContentError {
    fn into_response(self) -> Response {
        self.log();
        AppError::new(self.kind(), self.to_string()).into_response()
    }
}
