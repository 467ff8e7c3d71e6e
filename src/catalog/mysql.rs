use super::{ColumnDescriptor, TableReference};
use crate::error::AppError;
use sqlx::{MySqlPool, Row};
use tracing::debug;

// information_schema columns come back as VARBINARY on some servers, hence the CONVERTs.
const LIST_SCHEMAS: &str = r#"
    SELECT CONVERT(SCHEMA_NAME USING utf8mb4) AS SCHEMA_NAME
    FROM information_schema.SCHEMATA
    WHERE SCHEMA_NAME NOT IN ('information_schema', 'mysql', 'performance_schema', 'sys')
    ORDER BY SCHEMA_NAME
"#;

const LIST_TABLES: &str = r#"
    SELECT CONVERT(TABLE_NAME USING utf8mb4) AS TABLE_NAME
    FROM information_schema.TABLES
    WHERE TABLE_SCHEMA = ?
      AND TABLE_TYPE = 'BASE TABLE'
    ORDER BY TABLE_NAME
"#;

const DESCRIBE_COLUMNS: &str = r#"
    SELECT
        CONVERT(COLUMN_NAME USING utf8mb4) AS COLUMN_NAME,
        CONVERT(COLUMN_TYPE USING utf8mb4) AS COLUMN_TYPE,
        CONVERT(IS_NULLABLE USING utf8mb4) AS IS_NULLABLE,
        (COLUMN_DEFAULT IS NOT NULL OR EXTRA LIKE '%auto_increment%') AS HAS_DEFAULT
    FROM information_schema.COLUMNS
    WHERE TABLE_SCHEMA = ? AND TABLE_NAME = ?
    ORDER BY ORDINAL_POSITION
"#;

const PRIMARY_KEY: &str = r#"
    SELECT CONVERT(COLUMN_NAME USING utf8mb4) AS COLUMN_NAME
    FROM information_schema.KEY_COLUMN_USAGE
    WHERE TABLE_SCHEMA = ? AND TABLE_NAME = ?
      AND CONSTRAINT_NAME = 'PRIMARY'
    ORDER BY ORDINAL_POSITION
"#;

pub(super) async fn list_schemas(pool: &MySqlPool) -> Result<Vec<String>, AppError> {
    let schemas = sqlx::query_scalar::<_, String>(LIST_SCHEMAS)
        .fetch_all(pool)
        .await
        .map_err(AppError::Introspection)?;
    debug!(count = schemas.len(), "listed MySQL schemas");
    Ok(schemas)
}

pub(super) async fn list_tables(pool: &MySqlPool, schema: &str) -> Result<Vec<String>, AppError> {
    sqlx::query_scalar::<_, String>(LIST_TABLES)
        .bind(schema)
        .fetch_all(pool)
        .await
        .map_err(AppError::Introspection)
}

pub(super) async fn columns_of(
    pool: &MySqlPool,
    table: &TableReference,
) -> Result<Vec<ColumnDescriptor>, AppError> {
    let rows = sqlx::query(DESCRIBE_COLUMNS)
        .bind(&table.schema)
        .bind(&table.table)
        .fetch_all(pool)
        .await
        .map_err(AppError::Introspection)?;

    rows.iter()
        .map(|row| {
            let name: String = row.try_get("COLUMN_NAME")?;
            let column_type: String = row.try_get("COLUMN_TYPE")?;
            let is_nullable: String = row.try_get("IS_NULLABLE")?;
            let has_default: i64 = row.try_get("HAS_DEFAULT")?;
            Ok(ColumnDescriptor::new(name, column_type, is_nullable.eq_ignore_ascii_case("YES"))
                .with_default(has_default != 0))
        })
        .collect::<Result<Vec<_>, sqlx::Error>>()
        .map_err(AppError::Introspection)
}

pub(super) async fn primary_key_columns(
    pool: &MySqlPool,
    table: &TableReference,
) -> Result<Vec<String>, AppError> {
    sqlx::query_scalar::<_, String>(PRIMARY_KEY)
        .bind(&table.schema)
        .bind(&table.table)
        .fetch_all(pool)
        .await
        .map_err(AppError::Introspection)
}
