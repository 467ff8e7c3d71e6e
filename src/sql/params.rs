//! Convert untyped JSON payload values into bindable values, checked against the column kind.

use crate::catalog::{ColumnDescriptor, ColumnKind};
use crate::error::AppError;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde_json::Value;

/// A value that can be bound to any supported backend.
#[derive(Clone, Debug, PartialEq)]
pub enum SqlValue {
    Null,
    Int(i64),
    Float(f64),
    Text(String),
    Bool(bool),
    Bytes(Vec<u8>),
}

impl SqlValue {
    /// Coerce `value` for `column`. Mismatches are validation errors naming the column.
    pub fn coerce(value: &Value, column: &ColumnDescriptor) -> Result<Self, AppError> {
        if value.is_null() {
            if !column.nullable {
                return Err(mismatch(column, "a non-null value"));
            }
            return Ok(SqlValue::Null);
        }
        match column.kind {
            ColumnKind::Integer => to_int(value).ok_or_else(|| mismatch(column, "an integer")),
            ColumnKind::Float => to_float(value).ok_or_else(|| mismatch(column, "a number")),
            ColumnKind::Decimal => match value {
                Value::Number(n) => Ok(SqlValue::Text(n.to_string())),
                Value::String(s) if s.trim().parse::<f64>().is_ok() => Ok(SqlValue::Text(s.trim().to_string())),
                _ => Err(mismatch(column, "a decimal number")),
            },
            ColumnKind::Boolean => to_bool(value).ok_or_else(|| mismatch(column, "a boolean")),
            ColumnKind::Binary => to_bytes(value).ok_or_else(|| mismatch(column, "base64 text or an array of bytes")),
            ColumnKind::Json => Ok(SqlValue::Text(value.to_string())),
            ColumnKind::Uuid => value
                .as_str()
                .and_then(|s| uuid::Uuid::parse_str(s).ok())
                .map(|u| SqlValue::Text(u.to_string()))
                .ok_or_else(|| mismatch(column, "a UUID string")),
            ColumnKind::Temporal => value
                .as_str()
                .map(|s| SqlValue::Text(s.to_string()))
                .ok_or_else(|| mismatch(column, "a date/time string")),
            ColumnKind::Text | ColumnKind::Other => match value {
                Value::String(s) => Ok(SqlValue::Text(s.clone())),
                Value::Number(n) => Ok(SqlValue::Text(n.to_string())),
                Value::Bool(b) => Ok(SqlValue::Text(b.to_string())),
                _ => Err(mismatch(column, "a scalar value")),
            },
        }
    }
}

fn mismatch(column: &ColumnDescriptor, expected: &str) -> AppError {
    AppError::Validation(format!(
        "column '{}' ({}) expects {}",
        column.name, column.data_type, expected
    ))
}

fn to_int(value: &Value) -> Option<SqlValue> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64).map(|f| f as i64))
            .map(SqlValue::Int),
        Value::String(s) => s.trim().parse::<i64>().ok().map(SqlValue::Int),
        _ => None,
    }
}

fn to_float(value: &Value) -> Option<SqlValue> {
    match value {
        Value::Number(n) => n.as_f64().map(SqlValue::Float),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()).map(SqlValue::Float),
        _ => None,
    }
}

fn to_bool(value: &Value) -> Option<SqlValue> {
    match value {
        Value::Bool(b) => Some(SqlValue::Bool(*b)),
        Value::Number(n) => match n.as_i64() {
            Some(0) => Some(SqlValue::Bool(false)),
            Some(1) => Some(SqlValue::Bool(true)),
            _ => None,
        },
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "1" => Some(SqlValue::Bool(true)),
            "false" | "0" => Some(SqlValue::Bool(false)),
            _ => None,
        },
        _ => None,
    }
}

fn to_bytes(value: &Value) -> Option<SqlValue> {
    match value {
        Value::String(s) => BASE64.decode(s).ok().map(SqlValue::Bytes),
        Value::Array(items) => items
            .iter()
            .map(|v| v.as_u64().and_then(|n| u8::try_from(n).ok()))
            .collect::<Option<Vec<u8>>>()
            .map(SqlValue::Bytes),
        _ => None,
    }
}
