//! In-memory backend for unit tests: a fixed catalog plus a statement recorder.

use crate::catalog::{ColumnDescriptor, PrimaryKeyDescriptor, SchemaIntrospector, TableReference};
use crate::db::{Backend, ResultRow, StatementExecutor};
use crate::error::AppError;
use crate::sql::{Dialect, Statement};
use async_trait::async_trait;
use std::sync::Mutex;

struct FakeTable {
    name: String,
    columns: Vec<ColumnDescriptor>,
    primary_key: Vec<String>,
}

pub(crate) struct FakeBackend {
    dialect: Dialect,
    schemas: Vec<(String, Vec<FakeTable>)>,
    affected: u64,
    rows: Vec<ResultRow>,
    executed: Mutex<Vec<Statement>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        FakeBackend {
            dialect: Dialect::Sqlite,
            schemas: Vec::new(),
            affected: 1,
            rows: Vec::new(),
            executed: Mutex::new(Vec::new()),
        }
    }

    pub fn with_dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = dialect;
        self
    }

    pub fn with_schema(mut self, schema: &str) -> Self {
        self.schema_mut(schema);
        self
    }

    /// Columns are `(name, declared type, nullable)`; an empty `primary_key` means none.
    pub fn with_table(
        mut self,
        schema: &str,
        table: &str,
        columns: &[(&str, &str, bool)],
        primary_key: &[&str],
    ) -> Self {
        let columns = columns
            .iter()
            .map(|(name, ty, nullable)| ColumnDescriptor::new(*name, *ty, *nullable))
            .collect();
        self.schema_mut(schema).push(FakeTable {
            name: table.to_string(),
            columns,
            primary_key: primary_key.iter().map(|c| c.to_string()).collect(),
        });
        self
    }

    /// Row count every write reports.
    pub fn with_affected(mut self, affected: u64) -> Self {
        self.affected = affected;
        self
    }

    pub fn with_rows(mut self, rows: Vec<ResultRow>) -> Self {
        self.rows = rows;
        self
    }

    pub fn known_tables(&self) -> Vec<(String, String)> {
        self.schemas
            .iter()
            .flat_map(|(s, tables)| tables.iter().map(move |t| (s.clone(), t.name.clone())))
            .collect()
    }

    pub fn executed(&self) -> Vec<Statement> {
        self.executed.lock().unwrap().clone()
    }

    fn schema_mut(&mut self, schema: &str) -> &mut Vec<FakeTable> {
        let idx = match self.schemas.iter().position(|(s, _)| s == schema) {
            Some(i) => i,
            None => {
                self.schemas.push((schema.to_string(), Vec::new()));
                self.schemas.len() - 1
            }
        };
        &mut self.schemas[idx].1
    }

    fn table(&self, reference: &TableReference) -> Option<&FakeTable> {
        self.schemas
            .iter()
            .find(|(s, _)| *s == reference.schema)
            .and_then(|(_, tables)| tables.iter().find(|t| t.name == reference.table))
    }
}

#[async_trait]
impl SchemaIntrospector for FakeBackend {
    async fn list_schemas(&self) -> Result<Vec<String>, AppError> {
        Ok(self.schemas.iter().map(|(s, _)| s.clone()).collect())
    }

    async fn list_tables(&self, schema: &str) -> Result<Vec<String>, AppError> {
        Ok(self
            .schemas
            .iter()
            .find(|(s, _)| s == schema)
            .map(|(_, tables)| tables.iter().map(|t| t.name.clone()).collect())
            .unwrap_or_default())
    }

    async fn columns_of(&self, table: &TableReference) -> Result<Vec<ColumnDescriptor>, AppError> {
        Ok(self.table(table).map(|t| t.columns.clone()).unwrap_or_default())
    }

    async fn primary_key_of(
        &self,
        table: &TableReference,
    ) -> Result<Option<PrimaryKeyDescriptor>, AppError> {
        Ok(self
            .table(table)
            .filter(|t| !t.primary_key.is_empty())
            .map(|t| PrimaryKeyDescriptor::new(t.primary_key.clone())))
    }
}

#[async_trait]
impl StatementExecutor for FakeBackend {
    async fn fetch_rows(&self, statement: &Statement) -> Result<Vec<ResultRow>, AppError> {
        self.executed.lock().unwrap().push(statement.clone());
        Ok(self.rows.clone())
    }

    async fn execute(&self, statement: &Statement) -> Result<u64, AppError> {
        self.executed.lock().unwrap().push(statement.clone());
        Ok(self.affected)
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}

impl Backend for FakeBackend {
    fn dialect(&self) -> Dialect {
        self.dialect
    }
}
