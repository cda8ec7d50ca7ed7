//! Error conversions
//!
//! Database failures into [`AppError`], and [`AppError`] into an HTTP
//! problem response.

use super::app_error::AppError;
#[cfg(feature = "sqlx")]
use super::kind::ErrorKind;

// ============================================================================
// SQLx conversions (feature-gated)
// ============================================================================

/// PostgreSQL SQLSTATE for unique_violation.
pub const UNIQUE_VIOLATION: &str = "23505";

/// Name of the violated constraint when `err` is a unique violation.
#[cfg(feature = "sqlx")]
pub fn unique_violation(err: &sqlx::Error) -> Option<String> {
    match err {
        sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) => {
            Some(db_err.constraint().unwrap_or_default().to_string())
        }
        _ => None,
    }
}

/// Classify a database failure: 503 when the database is unreachable or
/// out of resources, 500 for everything else.
#[cfg(feature = "sqlx")]
pub fn database_error_kind(err: &sqlx::Error) -> ErrorKind {
    match err {
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
            ErrorKind::ServiceUnavailable
        }
        // https://www.postgresql.org/docs/current/errcodes-appendix.html
        sqlx::Error::Database(db_err) => match db_err.code().as_deref() {
            Some("53000" | "53100" | "53200" | "53300" | "57P01" | "57P02" | "57P03") => {
                ErrorKind::ServiceUnavailable
            }
            _ => ErrorKind::InternalServerError,
        },
        _ => ErrorKind::InternalServerError,
    }
}

#[cfg(feature = "sqlx")]
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        let app_err = match database_error_kind(&err) {
            ErrorKind::ServiceUnavailable => AppError::service_unavailable(
                "The service is temporarily unavailable. Please try again later.",
            ),
            kind => AppError::new(kind, "Something went wrong. Please try again later."),
        };
        app_err.with_source(err)
    }
}

// ============================================================================
// Axum conversions (feature-gated)
// ============================================================================

#[cfg(feature = "axum")]
impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        use axum::Json;
        use axum::http::StatusCode;

        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        // RFC 7807 Problem Details, plus the field list for validation failures
        let mut body = serde_json::json!({
            "type": format!("https://httpstatuses.io/{}", self.status_code()),
            "title": self.kind().as_str(),
            "status": self.status_code(),
            "detail": self.message(),
            "action": self.action(),
        });
        if !self.details().is_empty() {
            body["errors"] = serde_json::json!(self.details());
        }

        (status, Json(body)).into_response()
    }
}

#[cfg(all(test, feature = "sqlx"))]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_unreachable_database_is_503() {
        let app_err: AppError = sqlx::Error::PoolTimedOut.into();
        assert_eq!(app_err.kind(), ErrorKind::ServiceUnavailable);
        assert!(app_err.source().is_some());

        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        assert_eq!(database_error_kind(&sqlx::Error::Io(io)), ErrorKind::ServiceUnavailable);
    }

    #[test]
    fn test_other_database_errors_are_500() {
        let app_err: AppError = sqlx::Error::RowNotFound.into();
        assert_eq!(app_err.kind(), ErrorKind::InternalServerError);
        assert!(!app_err.message().contains("Row"));
        assert!(unique_violation(&sqlx::Error::RowNotFound).is_none());
    }
}
