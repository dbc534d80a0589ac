//! Validation error types

use std::fmt;

/// Validation error for request input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Path id is not an integer
    InvalidId { value: String },

    /// Body field is missing or not a string
    DataType { field: &'static str },

    /// Body is not a JSON object
    MalformedBody { reason: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidId { value } => write!(f, "Your id is invalid: '{}'", value),
            Self::DataType { field } => {
                write!(f, "Data type invalid: '{}' must be a string", field)
            }
            Self::MalformedBody { reason } => write!(f, "Malformed request body: {}", reason),
        }
    }
}

impl std::error::Error for ValidationError {}
