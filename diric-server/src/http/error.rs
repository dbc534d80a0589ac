//! API error types with IntoResponse
//!
//! Errors become plain-text responses with a status code. Database
//! failures are logged and answered with a generic message.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::db::DbError;
use crate::models::{EmployeeId, ValidationError};

/// API error type with automatic HTTP status mapping
#[derive(Debug)]
pub enum ApiError {
    /// Validation failed: 500 for a bad id or field type, 400 for a body
    /// that is not JSON
    Validation(ValidationError),

    /// Resource not found (404)
    NotFound { resource: &'static str, id: String },

    /// Backend returned no result set (500)
    NoData,

    /// Database error (500, logged)
    Database(DbError),
}

impl ApiError {
    pub fn employee_not_found(id: EmployeeId) -> Self {
        Self::NotFound {
            resource: "Employee",
            id: id.to_string(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(ValidationError::MalformedBody { .. }) => StatusCode::BAD_REQUEST,
            Self::Validation(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::NoData | Self::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            Self::Validation(e) => e.to_string(),
            Self::NotFound { resource, id } => format!("{} '{}' not found", resource, id),
            Self::NoData => "No data".to_string(),
            Self::Database(e) => {
                // Log the actual error, return generic message
                tracing::error!("Database error: {}", e);
                "Internal server error".to_string()
            }
        };

        (status, body).into_response()
    }
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        Self::Validation(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_text(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn field_and_id_errors_are_500() {
        let err = ApiError::Validation(ValidationError::DataType { field: "name" });
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body_text(response).await.starts_with("Data type invalid"));

        let err = ApiError::Validation(ValidationError::InvalidId { value: "abc".into() });
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body_text(response).await.starts_with("Your id is invalid"));
    }

    #[test]
    fn unparseable_body_is_400() {
        let err = ApiError::Validation(ValidationError::MalformedBody {
            reason: "EOF".into(),
        });
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn not_found_is_404() {
        let response = ApiError::employee_not_found(EmployeeId::new(5)).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_text(response).await, "Employee '5' not found");
    }

    #[tokio::test]
    async fn no_data_is_500() {
        let response = ApiError::NoData.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_text(response).await, "No data");
    }

    #[tokio::test]
    async fn database_error_hides_detail() {
        let err = ApiError::Database(DbError::Backend("password authentication failed".into()));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_text(response).await, "Internal server error");
    }
}
