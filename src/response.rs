//! Success response helpers.

use crate::db::ResultRow;
use axum::{http::StatusCode, Json};
use serde::Serialize;

#[derive(Serialize)]
pub struct MessageBody {
    pub message: String,
}

/// 200 with `{"message": ...}`.
pub fn message(text: impl Into<String>) -> (StatusCode, Json<MessageBody>) {
    (
        StatusCode::OK,
        Json(MessageBody {
            message: text.into(),
        }),
    )
}

/// 200 with the rows as a bare JSON array.
pub fn rows(rows: Vec<ResultRow>) -> (StatusCode, Json<Vec<ResultRow>>) {
    (StatusCode::OK, Json(rows))
}
