//! Auth Error Types
//!
//! This module provides auth-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.
//!
//! Every 401 variant renders one of two generic messages so a client
//! cannot tell which factor failed; the log line carries the detail.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::conversions::database_error_kind;
use kernel::error::{app_error::AppError, kind::ErrorKind};
use kernel::validation::FieldErrors;
use platform::password::PasswordHashError;
use platform::token::TokenError;
use thiserror::Error;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

const INVALID_TOKEN_MESSAGE: &str = "Invalid or expired token. Please log in again.";

/// Auth-specific error variants
#[derive(Debug, Error)]
pub enum AuthError {
    /// One or more input fields failed validation
    #[error("Invalid input data: {0}")]
    Validation(FieldErrors),

    /// Registration or profile update hit the unique email index
    #[error("Email address is already in use")]
    EmailTaken,

    /// Unknown email or wrong password
    #[error("Incorrect email or password")]
    InvalidCredentials,

    /// Password change with a wrong current password
    #[error("Your current password is wrong")]
    WrongCurrentPassword,

    /// No token on the request
    #[error("You are not logged in. Please log in to get access.")]
    Unauthenticated,

    /// Bad signature, malformed token, or the user no longer exists
    #[error("Token is invalid")]
    TokenInvalid,

    #[error("Token has expired")]
    TokenExpired,

    /// Token was issued before the user's last password change
    #[error("Token was issued before the last password change")]
    TokenStale,

    /// Role not in the operation's allow-list
    #[error("You do not have permission to perform this action")]
    Forbidden,

    /// Profile update carried password fields
    #[error("This route is not for password updates. Please use /me/password.")]
    PasswordFieldsNotAllowed,

    #[error("User not found")]
    UserNotFound,

    /// Hashing failed or a stored hash is malformed
    #[error("Password hash error: {0}")]
    PasswordHash(#[from] PasswordHashError),

    #[error("Token signing error: {0}")]
    TokenSigning(TokenError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.kind().status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::Validation(_) | AuthError::PasswordFieldsNotAllowed => {
                ErrorKind::BadRequest
            }
            AuthError::EmailTaken => ErrorKind::Conflict,
            AuthError::InvalidCredentials
            | AuthError::WrongCurrentPassword
            | AuthError::Unauthenticated
            | AuthError::TokenInvalid
            | AuthError::TokenExpired
            | AuthError::TokenStale => ErrorKind::Unauthorized,
            AuthError::Forbidden => ErrorKind::Forbidden,
            AuthError::UserNotFound => ErrorKind::NotFound,
            AuthError::Database(e) => database_error_kind(e),
            AuthError::PasswordHash(_) | AuthError::TokenSigning(_) | AuthError::Internal(_) => {
                ErrorKind::InternalServerError
            }
        }
    }

    /// Convert to AppError
    pub fn to_app_error(&self) -> AppError {
        match self {
            AuthError::Validation(errors) => AppError::validation(errors.clone()),
            AuthError::TokenInvalid | AuthError::TokenExpired | AuthError::TokenStale => {
                AppError::unauthorized(INVALID_TOKEN_MESSAGE)
            }
            AuthError::Unauthenticated => {
                AppError::unauthorized(self.to_string()).with_action("Log in and retry")
            }
            _ if self.kind().is_server_error() => {
                AppError::new(self.kind(), "Something went wrong. Please try again later.")
            }
            _ => AppError::new(self.kind(), self.to_string()),
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            AuthError::Database(e) => {
                tracing::error!(error = %e, "Auth database error");
            }
            AuthError::PasswordHash(e) => {
                tracing::error!(error = %e, "Password hash failure");
            }
            AuthError::TokenSigning(e) => {
                tracing::error!(error = %e, "Token signing failure");
            }
            AuthError::Internal(msg) => {
                tracing::error!(message = %msg, "Auth internal error");
            }
            AuthError::InvalidCredentials => {
                tracing::warn!("Invalid login attempt");
            }
            AuthError::WrongCurrentPassword => {
                tracing::warn!("Password change with wrong current password");
            }
            AuthError::TokenStale => {
                tracing::warn!("Rejected token issued before password change");
            }
            AuthError::Forbidden => {
                tracing::warn!("Role not permitted for operation");
            }
            _ => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Database(e) => AppError::from(e),
            other => other.to_app_error(),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log();
        AppError::from(self).into_response()
    }
}

impl From<FieldErrors> for AuthError {
    fn from(errors: FieldErrors) -> Self {
        AuthError::Validation(errors)
    }
}

impl From<TokenError> for AuthError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Expired => AuthError::TokenExpired,
            TokenError::Invalid => AuthError::TokenInvalid,
            other => AuthError::TokenSigning(other),
        }
    }
}

impl From<tokio::task::JoinError> for AuthError {
    fn from(err: tokio::task::JoinError) -> Self {
        AuthError::Internal(format!("Blocking task failed: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        let cases = [
            (AuthError::Validation(FieldErrors::new()), 400),
            (AuthError::PasswordFieldsNotAllowed, 400),
            (AuthError::InvalidCredentials, 401),
            (AuthError::WrongCurrentPassword, 401),
            (AuthError::Unauthenticated, 401),
            (AuthError::TokenInvalid, 401),
            (AuthError::TokenExpired, 401),
            (AuthError::TokenStale, 401),
            (AuthError::Forbidden, 403),
            (AuthError::UserNotFound, 404),
            (AuthError::EmailTaken, 409),
            (AuthError::PasswordHash(PasswordHashError::InvalidHashFormat), 500),
            (AuthError::Internal("boom".into()), 500),
            (AuthError::Database(sqlx::Error::RowNotFound), 500),
            (AuthError::Database(sqlx::Error::PoolTimedOut), 503),
        ];

        for (error, expected) in cases {
            assert_eq!(error.status_code().as_u16(), expected, "{error:?}");
        }
    }

    #[test]
    fn test_token_errors_share_one_message() {
        let messages: Vec<String> = [
            AuthError::TokenInvalid,
            AuthError::TokenExpired,
            AuthError::TokenStale,
        ]
        .iter()
        .map(|e| e.to_app_error().message().to_string())
        .collect();

        assert!(messages.iter().all(|m| m == INVALID_TOKEN_MESSAGE));
    }

    #[test]
    fn test_server_errors_hide_detail() {
        let err = AuthError::Internal("connection string leaked".into()).to_app_error();
        assert!(!err.message().contains("connection string"));
    }

    #[test]
    fn test_validation_carries_fields() {
        let mut errors = FieldErrors::new();
        errors.push("email", "Please provide a valid email");
        let app_err = AuthError::Validation(errors).to_app_error();
        assert_eq!(app_err.details().len(), 1);
        assert_eq!(app_err.details()[0].field, "email");
    }

    #[test]
    fn test_from_token_error() {
        assert!(matches!(AuthError::from(TokenError::Expired), AuthError::TokenExpired));
        assert!(matches!(AuthError::from(TokenError::Invalid), AuthError::TokenInvalid));
        assert!(matches!(
            AuthError::from(TokenError::WeakSecret { min: 32, actual: 1 }),
            AuthError::TokenSigning(_)
        ));
    }
}
