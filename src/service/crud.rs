//! Table CRUD: resolve the table, describe it, build one statement, run it.

use crate::catalog::{ResolutionPolicy, TableReference, TableResolver, TableSchema};
use crate::db::{Backend, ResultRow};
use crate::error::AppError;
use crate::sql::{self, RecordPayload};
use serde_json::Value;

/// The table a request addresses: a bare name plus an optional schema hint.
#[derive(Clone, Copy, Debug)]
pub struct TableTarget<'a> {
    pub table_name: &'a str,
    pub schema_name: Option<&'a str>,
}

impl<'a> TableTarget<'a> {
    pub fn new(table_name: &'a str, schema_name: Option<&'a str>) -> Self {
        TableTarget {
            table_name,
            schema_name,
        }
    }
}

pub struct CrudService;

impl CrudService {
    /// Every row of the table, every column, in the order the database returns them.
    pub async fn read_table(
        backend: &dyn Backend,
        policy: ResolutionPolicy,
        target: TableTarget<'_>,
    ) -> Result<Vec<ResultRow>, AppError> {
        let table = Self::describe(backend, policy, target).await?;
        let statement = sql::select_all(backend.dialect(), &table);
        backend.fetch_rows(&statement).await
    }

    /// Insert one row. Columns left out of `data` take their database defaults.
    pub async fn add_record(
        backend: &dyn Backend,
        policy: ResolutionPolicy,
        target: TableTarget<'_>,
        data: &RecordPayload,
    ) -> Result<(), AppError> {
        let table = Self::describe(backend, policy, target).await?;
        let statement = sql::insert(backend.dialect(), &table, data)?;
        let affected = backend.execute(&statement).await?;
        tracing::info!(table = %table.reference, affected, "record added");
        Ok(())
    }

    /// Update the row whose primary key equals `pk`; no matching row is `NotFound`.
    pub async fn update_record(
        backend: &dyn Backend,
        policy: ResolutionPolicy,
        target: TableTarget<'_>,
        pk: &Value,
        data: &RecordPayload,
    ) -> Result<(), AppError> {
        let table = Self::describe(backend, policy, target).await?;
        let statement = sql::update(backend.dialect(), &table, pk, data)?;
        let affected = backend.execute(&statement).await?;
        Self::expect_match(&table, pk, affected)?;
        tracing::info!(table = %table.reference, affected, "record updated");
        Ok(())
    }

    /// Delete the row whose primary key equals `pk`; no matching row is `NotFound`.
    pub async fn delete_record(
        backend: &dyn Backend,
        policy: ResolutionPolicy,
        target: TableTarget<'_>,
        pk: &Value,
    ) -> Result<(), AppError> {
        let table = Self::describe(backend, policy, target).await?;
        let statement = sql::delete(backend.dialect(), &table, pk)?;
        let affected = backend.execute(&statement).await?;
        Self::expect_match(&table, pk, affected)?;
        tracing::info!(table = %table.reference, affected, "record deleted");
        Ok(())
    }

    async fn describe(
        backend: &dyn Backend,
        policy: ResolutionPolicy,
        target: TableTarget<'_>,
    ) -> Result<TableSchema, AppError> {
        let reference: TableReference = TableResolver::new(backend, policy)
            .resolve(target.table_name, target.schema_name)
            .await?;
        backend.describe(&reference).await
    }

    fn expect_match(table: &TableSchema, pk: &Value, affected: u64) -> Result<(), AppError> {
        if affected > 0 {
            return Ok(());
        }
        let column = table.primary_key_column()?;
        Err(AppError::NotFound(format!(
            "no record in {} with {} = {}",
            table.reference, column.name, pk
        )))
    }
}
