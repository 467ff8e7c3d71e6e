//! Typed errors and HTTP mapping.

use crate::catalog::TableReference;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing environment variable {0}")]
    MissingVariable(&'static str),
    #[error("invalid value for {name}: '{value}' ({reason})")]
    InvalidValue {
        name: &'static str,
        value: String,
        reason: String,
    },
    #[error("unsupported database driver: {0} (expected postgres, mysql or sqlite)")]
    UnsupportedDriver(String),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("validation: {0}")]
    Validation(String),
    #[error("table '{table}' exists in several schemas: {}", .schemas.join(", "))]
    AmbiguousTable { table: String, schemas: Vec<String> },
    #[error("not found: {0}")]
    NotFound(String),
    #[error("table {0} has no primary key")]
    MissingPrimaryKey(TableReference),
    #[error("introspection failed")]
    Introspection(#[source] sqlx::Error),
    #[error("statement execution failed")]
    Db(#[from] sqlx::Error),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::AmbiguousTable { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) | AppError::MissingPrimaryKey(_) => StatusCode::NOT_FOUND,
            AppError::Config(_) | AppError::Introspection(_) | AppError::Db(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AppError::Config(_) => "config_error",
            AppError::Validation(_) => "validation_error",
            AppError::AmbiguousTable { .. } => "ambiguous_table",
            AppError::NotFound(_) => "not_found",
            AppError::MissingPrimaryKey(_) => "missing_primary_key",
            AppError::Introspection(_) => "introspection_error",
            AppError::Db(_) => "execution_error",
        }
    }

    /// Driver detail for database failures; the database's own message when it produced one.
    fn details(&self) -> Option<serde_json::Value> {
        let err = match self {
            AppError::Introspection(e) | AppError::Db(e) => e,
            AppError::AmbiguousTable { schemas, .. } => {
                return Some(serde_json::json!({ "schemas": schemas }));
            }
            _ => return None,
        };
        let message = match err.as_database_error() {
            Some(db) => db.message().to_string(),
            None => err.to_string(),
        };
        Some(serde_json::Value::String(message))
    }
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = ?self, "request failed");
        }
        let body = ErrorBody {
            error: ErrorDetail {
                code: self.code().to_string(),
                message: self.to_string(),
                details: self.details(),
            },
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn employees() -> TableReference {
        TableReference::new("hr", "Employees")
    }

    #[test]
    fn client_faults_map_to_400() {
        assert_eq!(AppError::Validation("x".into()).status_code(), StatusCode::BAD_REQUEST);
        let ambiguous = AppError::AmbiguousTable {
            table: "Employees".into(),
            schemas: vec!["hr".into(), "sales".into()],
        };
        assert_eq!(ambiguous.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ambiguous.to_string(),
            "table 'Employees' exists in several schemas: hr, sales"
        );
    }

    #[test]
    fn absence_maps_to_404() {
        assert_eq!(AppError::NotFound("t".into()).status_code(), StatusCode::NOT_FOUND);
        let missing = AppError::MissingPrimaryKey(employees());
        assert_eq!(missing.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(missing.code(), "missing_primary_key");
        assert_eq!(missing.to_string(), "table hr.Employees has no primary key");
    }

    #[test]
    fn driver_failures_map_to_500_with_details() {
        let err = AppError::Db(sqlx::Error::PoolTimedOut);
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.code(), "execution_error");
        assert!(err.details().is_some());
        assert!(AppError::NotFound("t".into()).details().is_none());
    }
}
