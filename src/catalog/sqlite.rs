//! SQLite exposes attached databases as schemas (`main` plus every `ATTACH ... AS name`).

use super::{ColumnDescriptor, TableReference};
use crate::error::AppError;
use sqlx::{Row, SqlitePool};
use tracing::debug;

const LIST_SCHEMAS: &str = r#"
    SELECT name FROM pragma_database_list
    WHERE name <> 'temp'
    ORDER BY seq
"#;

const LIST_TABLES: &str = r#"
    SELECT name FROM pragma_table_list
    WHERE schema = ?1
      AND type = 'table'
      AND name NOT LIKE 'sqlite\_%' ESCAPE '\'
    ORDER BY name
"#;

// Table-valued pragma arguments are (table, schema).
const DESCRIBE_COLUMNS: &str = r#"
    SELECT name, type, "notnull" AS not_null, dflt_value IS NOT NULL AS has_default
    FROM pragma_table_info(?1, ?2)
    ORDER BY cid
"#;

const PRIMARY_KEY: &str = r#"
    SELECT name FROM pragma_table_info(?1, ?2)
    WHERE pk > 0
    ORDER BY pk
"#;

pub(super) async fn list_schemas(pool: &SqlitePool) -> Result<Vec<String>, AppError> {
    let schemas = sqlx::query_scalar::<_, String>(LIST_SCHEMAS)
        .fetch_all(pool)
        .await
        .map_err(AppError::Introspection)?;
    debug!(count = schemas.len(), "listed SQLite schemas");
    Ok(schemas)
}

pub(super) async fn list_tables(pool: &SqlitePool, schema: &str) -> Result<Vec<String>, AppError> {
    sqlx::query_scalar::<_, String>(LIST_TABLES)
        .bind(schema)
        .fetch_all(pool)
        .await
        .map_err(AppError::Introspection)
}

pub(super) async fn columns_of(
    pool: &SqlitePool,
    table: &TableReference,
) -> Result<Vec<ColumnDescriptor>, AppError> {
    let rows = sqlx::query(DESCRIBE_COLUMNS)
        .bind(&table.table)
        .bind(&table.schema)
        .fetch_all(pool)
        .await
        .map_err(AppError::Introspection)?;

    rows.iter()
        .map(|row| {
            let name: String = row.try_get("name")?;
            let declared: String = row.try_get("type")?;
            let not_null: i64 = row.try_get("not_null")?;
            let has_default: i64 = row.try_get("has_default")?;
            Ok(ColumnDescriptor::new(name, declared, not_null == 0).with_default(has_default != 0))
        })
        .collect::<Result<Vec<_>, sqlx::Error>>()
        .map_err(AppError::Introspection)
}

pub(super) async fn primary_key_columns(
    pool: &SqlitePool,
    table: &TableReference,
) -> Result<Vec<String>, AppError> {
    sqlx::query_scalar::<_, String>(PRIMARY_KEY)
        .bind(&table.table)
        .bind(&table.schema)
        .fetch_all(pool)
        .await
        .map_err(AppError::Introspection)
}
