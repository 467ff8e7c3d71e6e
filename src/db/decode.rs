//! Map driver rows to loosely typed JSON records, decoding each cell by its reported type.
//!
//! A cell that cannot be decoded fails the whole row with [`AppError::Db`]; it is never
//! reported as SQL NULL.

use super::ResultRow;
use crate::error::AppError;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde_json::Value;
use sqlx::mysql::MySqlRow;
use sqlx::postgres::PgRow;
use sqlx::sqlite::SqliteRow;
use sqlx::{Column, ColumnIndex, Row, TypeInfo, ValueRef};

pub(crate) fn pg_row(row: &PgRow) -> Result<ResultRow, AppError> {
    row.columns()
        .iter()
        .map(|c| {
            pg_cell(row, c.ordinal(), c.type_info().name())
                .map(|v| (c.name().to_string(), v))
                .map_err(AppError::Db)
        })
        .collect()
}

pub(crate) fn mysql_row(row: &MySqlRow) -> Result<ResultRow, AppError> {
    row.columns()
        .iter()
        .map(|c| {
            mysql_cell(row, c.ordinal(), c.type_info().name())
                .map(|v| (c.name().to_string(), v))
                .map_err(AppError::Db)
        })
        .collect()
}

pub(crate) fn sqlite_row(row: &SqliteRow) -> Result<ResultRow, AppError> {
    row.columns()
        .iter()
        .map(|c| {
            sqlite_cell(row, c.ordinal(), c.type_info().name())
                .map(|v| (c.name().to_string(), v))
                .map_err(AppError::Db)
        })
        .collect()
}

fn is_null<R>(row: &R, idx: usize) -> bool
where
    R: Row,
    usize: ColumnIndex<R>,
{
    row.try_get_raw(idx).map(|v| v.is_null()).unwrap_or(true)
}

fn text(s: String) -> Value {
    Value::String(s)
}

fn bytes(b: Vec<u8>) -> Value {
    Value::String(BASE64.encode(b))
}

fn datetime_utc(d: DateTime<Utc>) -> Value {
    Value::String(d.to_rfc3339())
}

fn datetime(d: NaiveDateTime) -> Value {
    Value::String(d.format("%Y-%m-%dT%H:%M:%S%.f").to_string())
}

fn date(d: NaiveDate) -> Value {
    Value::String(d.format("%Y-%m-%d").to_string())
}

fn time(t: NaiveTime) -> Value {
    Value::String(t.format("%H:%M:%S%.f").to_string())
}

fn pg_cell(row: &PgRow, idx: usize, type_name: &str) -> Result<Value, sqlx::Error> {
    if is_null(row, idx) {
        return Ok(Value::Null);
    }
    match type_name {
        "INT2" => row.try_get::<i16, _>(idx).map(Value::from),
        "INT4" => row.try_get::<i32, _>(idx).map(Value::from),
        "INT8" => row.try_get::<i64, _>(idx).map(Value::from),
        "FLOAT4" => row.try_get::<f32, _>(idx).map(|f| Value::from(f64::from(f))),
        "FLOAT8" => row.try_get::<f64, _>(idx).map(Value::from),
        "BOOL" => row.try_get::<bool, _>(idx).map(Value::Bool),
        "UUID" => row.try_get::<uuid::Uuid, _>(idx).map(|u| Value::String(u.to_string())),
        "TIMESTAMPTZ" => row.try_get::<DateTime<Utc>, _>(idx).map(datetime_utc),
        "TIMESTAMP" => row.try_get::<NaiveDateTime, _>(idx).map(datetime),
        "DATE" => row.try_get::<NaiveDate, _>(idx).map(date),
        "TIME" => row.try_get::<NaiveTime, _>(idx).map(time),
        "JSON" | "JSONB" => row.try_get::<Value, _>(idx),
        "BYTEA" => row.try_get::<Vec<u8>, _>(idx).map(bytes),
        _ => row.try_get::<String, _>(idx).map(text),
    }
}

fn mysql_cell(row: &MySqlRow, idx: usize, type_name: &str) -> Result<Value, sqlx::Error> {
    if is_null(row, idx) {
        return Ok(Value::Null);
    }
    let decoded = match type_name {
        "BOOLEAN" => row.try_get::<bool, _>(idx).map(Value::Bool),
        // YEAR is flagged unsigned but not named so
        "YEAR" => row.try_get::<u16, _>(idx).map(Value::from),
        t if t.ends_with("UNSIGNED") => row.try_get::<u64, _>(idx).map(Value::from),
        "TINYINT" | "SMALLINT" | "MEDIUMINT" | "INT" | "BIGINT" => {
            row.try_get::<i64, _>(idx).map(Value::from)
        }
        "FLOAT" => row.try_get::<f32, _>(idx).map(|f| Value::from(f64::from(f))),
        "DOUBLE" => row.try_get::<f64, _>(idx).map(Value::from),
        "TIMESTAMP" => row.try_get::<DateTime<Utc>, _>(idx).map(datetime_utc),
        "DATETIME" => row.try_get::<NaiveDateTime, _>(idx).map(datetime),
        "DATE" => row.try_get::<NaiveDate, _>(idx).map(date),
        "TIME" => row.try_get::<NaiveTime, _>(idx).map(time),
        "JSON" => row.try_get::<Value, _>(idx),
        "BLOB" | "TINYBLOB" | "MEDIUMBLOB" | "LONGBLOB" | "BINARY" | "VARBINARY" => {
            row.try_get::<Vec<u8>, _>(idx).map(bytes)
        }
        _ => return row.try_get::<String, _>(idx).map(text),
    };
    // character-set quirks: some typed columns arrive as text
    decoded.or_else(|e| row.try_get::<String, _>(idx).map(text).map_err(|_| e))
}

/// SQLite values carry their own storage class, so the cell is decoded by that class.
/// `declared` is the column's declared type; it only turns integers into booleans.
fn sqlite_cell(row: &SqliteRow, idx: usize, declared: &str) -> Result<Value, sqlx::Error> {
    let raw = row.try_get_raw(idx)?;
    if raw.is_null() {
        return Ok(Value::Null);
    }
    let storage = raw.type_info().name().to_string();
    match storage.as_str() {
        "TEXT" => row.try_get::<String, _>(idx).map(text),
        "REAL" => row.try_get::<f64, _>(idx).map(Value::from),
        "BLOB" => row.try_get::<Vec<u8>, _>(idx).map(bytes),
        _ => {
            let as_bool = declared.eq_ignore_ascii_case("BOOLEAN");
            row.try_get::<i64, _>(idx)
                .map(|n| if as_bool { Value::Bool(n != 0) } else { Value::from(n) })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn fetch(sql: &str) -> SqliteRow {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        sqlx::query(sql).fetch_one(&pool).await.unwrap()
    }

    #[tokio::test]
    async fn test_cells_decode_by_storage_class() {
        let row = fetch("SELECT 1 AS i, 2.5 AS r, 'a' AS t, x'00ff' AS b, NULL AS n").await;
        let decoded = sqlite_row(&row).unwrap();
        assert_eq!(
            Value::Object(decoded),
            json!({"i": 1, "r": 2.5, "t": "a", "b": "AP8=", "n": null})
        );
    }

    #[tokio::test]
    async fn test_undecodable_cell_fails_the_row() {
        // TEXT storage holding bytes that are not UTF-8
        let row = fetch("SELECT 1 AS id, CAST(x'ff' AS TEXT) AS t").await;
        match sqlite_row(&row) {
            Err(AppError::Db(sqlx::Error::ColumnDecode { index, .. })) => assert!(index.contains('1'), "{}", index),
            other => panic!("expected a decode error, got {:?}", other),
        }
    }
}
