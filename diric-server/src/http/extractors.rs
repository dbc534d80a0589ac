//! Custom Axum extractors

use axum::extract::{FromRequest, FromRequestParts, Path, Request};
use axum::http::request::Parts;
use axum::Json;
use serde_json::Value;

use super::error::ApiError;
use crate::models::{EmployeeId, ValidationError};

/// Extract and validate an employee id from path
pub struct EmployeePath(pub EmployeeId);

impl<S> FromRequestParts<S> for EmployeePath
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw): Path<String> = Path::from_request_parts(parts, state)
            .await
            .map_err(|_| {
                ApiError::Validation(ValidationError::InvalidId {
                    value: String::new(),
                })
            })?;

        Ok(Self(EmployeeId::parse(&raw)?))
    }
}

/// JSON body kept as a raw value so fields can be type-checked by name
pub struct JsonBody(pub Value);

impl<S> FromRequest<S> for JsonBody
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<Value>::from_request(req, state)
            .await
            .map_err(|rejection| {
                ApiError::Validation(ValidationError::MalformedBody {
                    reason: rejection.body_text(),
                })
            })?;

        Ok(Self(value))
    }
}
