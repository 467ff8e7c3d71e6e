use super::{ColumnDescriptor, TableReference};
use crate::error::AppError;
use sqlx::{PgPool, Row};
use tracing::debug;

const LIST_SCHEMAS: &str = r#"
    SELECT nspname::text AS schema_name
    FROM pg_catalog.pg_namespace
    WHERE nspname <> 'information_schema'
      AND nspname NOT LIKE 'pg\_%'
    ORDER BY nspname
"#;

const LIST_TABLES: &str = r#"
    SELECT table_name::text AS table_name
    FROM information_schema.tables
    WHERE table_schema = $1
      AND table_type = 'BASE TABLE'
    ORDER BY table_name
"#;

// cast_type is schema-qualified so enums and domains outside the search_path still cast.
const DESCRIBE_COLUMNS: &str = r#"
    SELECT
        a.attname::text AS column_name,
        format_type(a.atttypid, a.atttypmod) AS data_type,
        NOT a.attnotnull AS is_nullable,
        a.atthasdef AS has_default,
        quote_ident(tn.nspname) || '.' || quote_ident(t.typname) AS cast_type
    FROM pg_catalog.pg_attribute a
    JOIN pg_catalog.pg_class c ON c.oid = a.attrelid
    JOIN pg_catalog.pg_namespace n ON n.oid = c.relnamespace
    JOIN pg_catalog.pg_type t ON t.oid = a.atttypid
    JOIN pg_catalog.pg_namespace tn ON tn.oid = t.typnamespace
    WHERE n.nspname = $1
      AND c.relname = $2
      AND a.attnum > 0
      AND NOT a.attisdropped
    ORDER BY a.attnum
"#;

const PRIMARY_KEY: &str = r#"
    SELECT a.attname::text AS column_name
    FROM pg_catalog.pg_index i
    JOIN pg_catalog.pg_class c ON c.oid = i.indrelid
    JOIN pg_catalog.pg_namespace n ON n.oid = c.relnamespace
    JOIN pg_catalog.pg_attribute a ON a.attrelid = c.oid AND a.attnum = ANY(i.indkey)
    WHERE i.indisprimary
      AND n.nspname = $1
      AND c.relname = $2
    ORDER BY array_position(i.indkey, a.attnum)
"#;

pub(super) async fn list_schemas(pool: &PgPool) -> Result<Vec<String>, AppError> {
    let schemas = sqlx::query_scalar::<_, String>(LIST_SCHEMAS)
        .fetch_all(pool)
        .await
        .map_err(AppError::Introspection)?;
    debug!(count = schemas.len(), "listed PostgreSQL schemas");
    Ok(schemas)
}

pub(super) async fn list_tables(pool: &PgPool, schema: &str) -> Result<Vec<String>, AppError> {
    sqlx::query_scalar::<_, String>(LIST_TABLES)
        .bind(schema)
        .fetch_all(pool)
        .await
        .map_err(AppError::Introspection)
}

pub(super) async fn columns_of(
    pool: &PgPool,
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
            let name: String = row.try_get("column_name")?;
            let data_type: String = row.try_get("data_type")?;
            let nullable: bool = row.try_get("is_nullable")?;
            let has_default: bool = row.try_get("has_default")?;
            let cast_type: String = row.try_get("cast_type")?;
            Ok(ColumnDescriptor::new(name, data_type, nullable)
                .with_default(has_default)
                .with_cast_type(cast_type))
        })
        .collect::<Result<Vec<_>, sqlx::Error>>()
        .map_err(AppError::Introspection)
}

pub(super) async fn primary_key_columns(
    pool: &PgPool,
    table: &TableReference,
) -> Result<Vec<String>, AppError> {
    sqlx::query_scalar::<_, String>(PRIMARY_KEY)
        .bind(&table.schema)
        .bind(&table.table)
        .fetch_all(pool)
        .await
        .map_err(AppError::Introspection)
}
