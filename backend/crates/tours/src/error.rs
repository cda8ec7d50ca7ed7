//! Tour Error Types
//!
//! Tour- and review-specific error variants that integrate with the
//! unified `kernel::error::AppError` system.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::conversions::database_error_kind;
use kernel::error::{app_error::AppError, kind::ErrorKind};
use kernel::validation::FieldErrors;
use thiserror::Error;

/// Tour-specific result type alias
pub type TourResult<T> = Result<T, TourError>;

#[derive(Debug, Error)]
pub enum TourError {
    /// One or more input fields failed validation
    #[error("Invalid input data: {0}")]
    Validation(FieldErrors),

    #[error("No tour found with that ID")]
    TourNotFound,

    #[error("No review found with that ID")]
    ReviewNotFound,

    /// Unique index on `tours.name`
    #[error("A tour with this name already exists")]
    TourNameTaken,

    /// Unique index on `reviews (tour_id, user_id)`
    #[error("You have already reviewed this tour")]
    ReviewExists,

    /// Review removal by someone other than its author or an admin
    #[error("You do not have permission to perform this action")]
    Forbidden,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl TourError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.kind().status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            TourError::Validation(_) => ErrorKind::BadRequest,
            TourError::TourNotFound | TourError::ReviewNotFound => ErrorKind::NotFound,
            TourError::TourNameTaken | TourError::ReviewExists => ErrorKind::Conflict,
            TourError::Forbidden => ErrorKind::Forbidden,
            TourError::Database(e) => database_error_kind(e),
            TourError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Convert to AppError
    pub fn to_app_error(&self) -> AppError {
        match self {
            TourError::Validation(errors) => AppError::validation(errors.clone()),
            _ if self.kind().is_server_error() => {
                AppError::new(self.kind(), "Something went wrong. Please try again later.")
            }
            _ => AppError::new(self.kind(), self.to_string()),
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            TourError::Database(e) => {
                tracing::error!(error = %e, "Tour database error");
            }
            TourError::Internal(msg) => {
                tracing::error!(message = %msg, "Tour internal error");
            }
            TourError::Forbidden => {
                tracing::warn!("Review removal denied");
            }
            _ => {
                tracing::debug!(error = %self, "Tour error");
            }
        }
    }
}

impl From<TourError> for AppError {
    fn from(err: TourError) -> Self {
        match err {
            TourError::Database(e) => AppError::from(e),
            other => other.to_app_error(),
        }
    }
}

impl IntoResponse for TourError {
    fn into_response(self) -> Response {
        self.log();
        AppError::from(self).into_response()
    }
}

impl From<FieldErrors> for TourError {
    fn from(errors: FieldErrors) -> Self {
        TourError::Validation(errors)
    }
}
