//! Schema catalog: live introspection of schemas, tables, columns and primary keys.
//!
//! Nothing here is cached. Every call re-reads the database's metadata views so a
//! table created or altered between two requests is seen by the second one.

mod mysql;
mod postgres;
pub mod resolver;
mod sqlite;
mod types;

pub use resolver::{ResolutionPolicy, TableResolver};
pub use types::*;

use crate::db::DbPool;
use crate::error::AppError;
use async_trait::async_trait;

/// Read-only view of the live database catalog.
///
/// Absence is never an error: an unknown schema lists no tables, an unknown table
/// has no columns and no key. Only driver failures surface as [`AppError::Introspection`].
#[async_trait]
pub trait SchemaIntrospector: Send + Sync {
    async fn list_schemas(&self) -> Result<Vec<String>, AppError>;

    async fn list_tables(&self, schema: &str) -> Result<Vec<String>, AppError>;

    async fn columns_of(&self, table: &TableReference) -> Result<Vec<ColumnDescriptor>, AppError>;

    async fn primary_key_of(
        &self,
        table: &TableReference,
    ) -> Result<Option<PrimaryKeyDescriptor>, AppError>;

    /// Columns and key of one table; `NotFound` when the table has no columns.
    async fn describe(&self, table: &TableReference) -> Result<TableSchema, AppError> {
        let columns = self.columns_of(table).await?;
        if columns.is_empty() {
            return Err(AppError::NotFound(format!("table {} not found", table)));
        }
        let primary_key = self.primary_key_of(table).await?;
        Ok(TableSchema {
            reference: table.clone(),
            columns,
            primary_key,
        })
    }
}

#[async_trait]
impl SchemaIntrospector for DbPool {
    async fn list_schemas(&self) -> Result<Vec<String>, AppError> {
        match self {
            DbPool::Postgres(p) => postgres::list_schemas(p).await,
            DbPool::MySql(p) => mysql::list_schemas(p).await,
            DbPool::Sqlite(p) => sqlite::list_schemas(p).await,
        }
    }

    async fn list_tables(&self, schema: &str) -> Result<Vec<String>, AppError> {
        match self {
            DbPool::Postgres(p) => postgres::list_tables(p, schema).await,
            DbPool::MySql(p) => mysql::list_tables(p, schema).await,
            DbPool::Sqlite(p) => sqlite::list_tables(p, schema).await,
        }
    }

    async fn columns_of(&self, table: &TableReference) -> Result<Vec<ColumnDescriptor>, AppError> {
        match self {
            DbPool::Postgres(p) => postgres::columns_of(p, table).await,
            DbPool::MySql(p) => mysql::columns_of(p, table).await,
            DbPool::Sqlite(p) => sqlite::columns_of(p, table).await,
        }
    }

    async fn primary_key_of(
        &self,
        table: &TableReference,
    ) -> Result<Option<PrimaryKeyDescriptor>, AppError> {
        let columns = match self {
            DbPool::Postgres(p) => postgres::primary_key_columns(p, table).await?,
            DbPool::MySql(p) => mysql::primary_key_columns(p, table).await?,
            DbPool::Sqlite(p) => sqlite::primary_key_columns(p, table).await?,
        };
        Ok((!columns.is_empty()).then(|| PrimaryKeyDescriptor::new(columns)))
    }
}
