//! Cross-cutting tests for the tours crate

#[cfg(test)]
mod error_tests {
    use crate::error::TourError;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use http_body_util::BodyExt;
    use kernel::error::kind::ErrorKind;
    use kernel::validation::FieldErrors;

    #[test]
    fn test_error_status_codes() {
        let cases = [
            (TourError::Validation(FieldErrors::new()), StatusCode::BAD_REQUEST),
            (TourError::TourNotFound, StatusCode::NOT_FOUND),
            (TourError::ReviewNotFound, StatusCode::NOT_FOUND),
            (TourError::TourNameTaken, StatusCode::CONFLICT),
            (TourError::ReviewExists, StatusCode::CONFLICT),
            (TourError::Forbidden, StatusCode::FORBIDDEN),
            (TourError::Internal("boom".into()), StatusCode::INTERNAL_SERVER_ERROR),
            (
                TourError::Database(sqlx::Error::PoolTimedOut),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (
                TourError::Database(sqlx::Error::RowNotFound),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(err.status_code(), status, "{err}");
        }
    }

    #[test]
    fn test_server_errors_hide_details() {
        let app_error = TourError::Internal("connection string leaked".into()).to_app_error();
        assert_eq!(app_error.kind(), ErrorKind::InternalServerError);
        assert!(!app_error.message().contains("leaked"));

        let app_error = TourError::TourNotFound.to_app_error();
        assert_eq!(app_error.message(), "No tour found with that ID");
    }

    #[tokio::test]
    async fn test_exhausted_pool_response() {
        let response = TourError::Database(sqlx::Error::PoolTimedOut).into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["status"], 503);
        assert!(!body["detail"].as_str().unwrap_or_default().contains("pool"));
    }

    #[tokio::test]
    async fn test_validation_response_lists_fields() {
        let mut errors = FieldErrors::new();
        errors.push("name", "A tour must have a name");
        errors.push("price", "A tour must have a price");

        let response = TourError::Validation(errors).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["errors"].as_array().map(Vec::len), Some(2));
        assert_eq!(body["errors"][1]["field"], "price");
    }
}

#[cfg(test)]
mod access_tests {
    use crate::domain::services::{REVIEW_MODERATORS, REVIEWERS, TOUR_GUIDES, TOUR_STAFF};
    use auth::UserRole;
    use auth::domain::service::role_gate::authorize;

    #[test]
    fn test_every_role_against_every_list() {
        let expect = [
            (UserRole::Admin, [true, true, false, true]),
            (UserRole::LeadGuide, [true, true, false, false]),
            (UserRole::Guide, [false, true, false, false]),
            (UserRole::User, [false, false, true, true]),
        ];

        for (role, allowed) in expect {
            let actual = [TOUR_STAFF, TOUR_GUIDES, REVIEWERS, REVIEW_MODERATORS]
                .map(|list| authorize(role, list));
            assert_eq!(actual, allowed, "{role}");
        }
    }
}
