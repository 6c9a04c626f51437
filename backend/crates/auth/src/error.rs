//! Auth Error Types
//!
//! This module provides auth-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

/// Auth-specific error variants
#[derive(Debug, Error)]
pub enum AuthError {
    /// No token cookie on the request
    #[error("You are not authorized - Please Login")]
    TokenMissing,

    /// Token decoded but its claims are unusable
    #[error("You are not authorized - Invalid token")]
    TokenInvalid,

    /// Token verification failed (bad signature, expired, malformed)
    #[error("Authentication failed")]
    AuthenticationFailed,

    /// Wrong email or password
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// User record not found
    #[error("User not found")]
    UserNotFound,

    /// Email already registered
    #[error("User Already exist. Please login")]
    EmailTaken,

    /// Submitted OTP is empty, consumed, or does not match
    #[error("Invalid OTP. Please try again")]
    InvalidOtp,

    /// Stored OTP is past its expiry
    #[error("OTP expired. Please request again")]
    OtpExpired,

    /// Password reset attempted without a completed OTP verification
    #[error("OTP verification is required before resetting the password")]
    OtpNotVerified,

    /// Provider callback could not be resolved to an identity
    #[error("Authentication failed")]
    OAuthFailed,

    /// Requested page is past the end of the result set
    #[error("No more page available")]
    PageOutOfRange,

    /// Missing required request field
    #[error("{0}")]
    MissingField(String),

    /// Email or password failed validation
    #[error("{0}")]
    Validation(String),

    /// Blob store upload failed
    #[error("Media upload failed")]
    Upload(#[from] platform::media::MediaError),

    /// Outbound mail failed
    #[error("Mail delivery failed")]
    Mail(#[from] platform::mailer::MailError),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::TokenMissing
            | AuthError::TokenInvalid
            | AuthError::AuthenticationFailed
            | AuthError::OtpNotVerified => StatusCode::FORBIDDEN,
            AuthError::InvalidCredentials | AuthError::InvalidOtp | AuthError::OAuthFailed => {
                StatusCode::UNAUTHORIZED
            }
            AuthError::OtpExpired => StatusCode::GONE,
            AuthError::UserNotFound | AuthError::PageOutOfRange => StatusCode::NOT_FOUND,
            AuthError::EmailTaken | AuthError::MissingField(_) | AuthError::Validation(_) => {
                StatusCode::BAD_REQUEST
            }
            AuthError::Upload(_)
            | AuthError::Mail(_)
            | AuthError::Database(_)
            | AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::TokenMissing
            | AuthError::TokenInvalid
            | AuthError::AuthenticationFailed
            | AuthError::OtpNotVerified => ErrorKind::Forbidden,
            AuthError::InvalidCredentials | AuthError::InvalidOtp | AuthError::OAuthFailed => {
                ErrorKind::Unauthorized
            }
            AuthError::OtpExpired => ErrorKind::Gone,
            AuthError::UserNotFound | AuthError::PageOutOfRange => ErrorKind::NotFound,
            AuthError::EmailTaken | AuthError::MissingField(_) | AuthError::Validation(_) => {
                ErrorKind::BadRequest
            }
            AuthError::Upload(_)
            | AuthError::Mail(_)
            | AuthError::Database(_)
            | AuthError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Convert to AppError
    pub fn to_app_error(&self) -> AppError {
        AppError::new(self.kind(), self.to_string())
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            AuthError::Database(e) => {
                tracing::error!(error = %e, "Auth database error");
            }
            AuthError::Upload(e) => {
                tracing::error!(error = %e, "Media upload error");
            }
            AuthError::Mail(e) => {
                tracing::error!(error = %e, "Mail delivery error");
            }
            AuthError::Internal(msg) => {
                tracing::error!(message = %msg, "Auth internal error");
            }
            AuthError::InvalidCredentials => {
                tracing::warn!("Invalid login attempt");
            }
            AuthError::InvalidOtp | AuthError::OtpExpired | AuthError::OtpNotVerified => {
                tracing::warn!(error = %self, "OTP verification rejected");
            }
            AuthError::OAuthFailed => {
                tracing::warn!("OAuth callback could not be resolved");
            }
            _ => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

impl From<AppError> for AuthError {
    fn from(err: AppError) -> Self {
        match err.kind() {
            ErrorKind::BadRequest => AuthError::Validation(err.message().to_string()),
            ErrorKind::NotFound => AuthError::UserNotFound,
            _ => AuthError::Internal(err.to_string()),
        }
    }
}

impl From<platform::token::TokenError> for AuthError {
    fn from(err: platform::token::TokenError) -> Self {
        match err {
            platform::token::TokenError::Expired => AuthError::AuthenticationFailed,
            platform::token::TokenError::Invalid | platform::token::TokenError::Malformed => {
                AuthError::TokenInvalid
            }
            platform::token::TokenError::Encoding => {
                AuthError::Internal("Failed to encode token".to_string())
            }
        }
    }
}

impl From<platform::password::PasswordPolicyError> for AuthError {
    fn from(err: platform::password::PasswordPolicyError) -> Self {
        AuthError::Validation(err.to_string())
    }
}

impl From<platform::password::PasswordHashError> for AuthError {
    fn from(err: platform::password::PasswordHashError) -> Self {
        AuthError::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gate_rejections_are_403() {
        assert_eq!(AuthError::TokenMissing.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(AuthError::TokenInvalid.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(
            AuthError::AuthenticationFailed.status_code(),
            StatusCode::FORBIDDEN
        );
    }

    #[test]
    fn test_otp_errors() {
        assert_eq!(AuthError::InvalidOtp.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(AuthError::OtpExpired.status_code(), StatusCode::GONE);
    }

    #[test]
    fn test_server_errors_map_to_500() {
        let err = AuthError::Internal("boom".to_string());
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.kind(), ErrorKind::InternalServerError);
    }
}
