//! Employee records and request payloads
//!
//! Payloads are checked field by field against the raw JSON so that a
//! non-string value is reported by name instead of as a serde error.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use super::ValidationError;

/// Employee row as stored and returned.
///
/// Writes always fill every text column, but the table has no NOT NULL
/// constraints, so rows are read back as they are and NULL becomes `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Employee {
    pub id: i64,
    pub name: Option<String>,
    pub soname: Option<String>,
    pub position: Option<String>,
    pub description: Option<String>,
}

/// Validated employee id from a path segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EmployeeId(i64);

impl EmployeeId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Parse an id, rejecting anything that is not an integer.
    ///
    /// # Example
    /// ```
    /// use diric_server::models::EmployeeId;
    ///
    /// assert_eq!(EmployeeId::parse("42").unwrap().get(), 42);
    /// assert!(EmployeeId::parse("abc").is_err());
    /// assert!(EmployeeId::parse("1.5").is_err());
    /// ```
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        raw.trim()
            .parse::<i64>()
            .map(Self)
            .map_err(|_| ValidationError::InvalidId {
                value: raw.to_owned(),
            })
    }

    pub fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for EmployeeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Body of `POST /employees`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct NewEmployee {
    pub name: String,
    pub soname: String,
    pub position: String,
    pub description: String,
}

impl NewEmployee {
    /// All four fields must be present and be JSON strings. Empty strings
    /// are accepted.
    pub fn from_json(body: &Value) -> Result<Self, ValidationError> {
        let object = as_object(body)?;
        Ok(Self {
            name: string_field(object, "name")?,
            soname: string_field(object, "soname")?,
            position: string_field(object, "position")?,
            description: string_field(object, "description")?,
        })
    }
}

/// Body of `PUT /employees/{id}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct PositionChange {
    pub position: String,
}

impl PositionChange {
    pub fn from_json(body: &Value) -> Result<Self, ValidationError> {
        let object = as_object(body)?;
        Ok(Self {
            position: string_field(object, "position")?,
        })
    }
}

fn as_object(body: &Value) -> Result<&serde_json::Map<String, Value>, ValidationError> {
    body.as_object().ok_or_else(|| ValidationError::MalformedBody {
        reason: "expected a JSON object".to_string(),
    })
}

fn string_field(
    object: &serde_json::Map<String, Value>,
    field: &'static str,
) -> Result<String, ValidationError> {
    match object.get(field) {
        Some(Value::String(s)) => Ok(s.clone()),
        _ => Err(ValidationError::DataType { field }),
    }
}
