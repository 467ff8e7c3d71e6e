//! Request-shape validation: required fields are present before any catalog lookup.

use crate::error::AppError;
use crate::sql::RecordPayload;
use serde_json::Value;

pub struct RequestValidator;

impl RequestValidator {
    /// `table_name` must be present and non-blank.
    pub fn table_name(value: Option<&str>) -> Result<&str, AppError> {
        match value {
            Some(name) if !name.trim().is_empty() => Ok(name),
            _ => Err(required("table_name")),
        }
    }

    /// Optional schema hint; blank counts as absent.
    pub fn schema_name(value: Option<&str>) -> Option<&str> {
        value.filter(|s| !s.trim().is_empty())
    }

    /// `pk` must be present and non-null. Zero and empty strings are valid keys.
    pub fn primary_key(value: Option<&Value>) -> Result<&Value, AppError> {
        match value {
            Some(v) if !v.is_null() => Ok(v),
            _ => Err(required("pk")),
        }
    }

    /// A column → value object named `field`. Emptiness is checked when the statement is built.
    pub fn payload<'a>(field: &str, value: Option<&'a RecordPayload>) -> Result<&'a RecordPayload, AppError> {
        value.ok_or_else(|| required(field))
    }
}

fn required(field: &str) -> AppError {
    AppError::Validation(format!("{} is required", field))
}
