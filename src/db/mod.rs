//! Connection pools and statement execution for the supported backends.

mod decode;
mod executor;
mod pool;

pub use pool::DbPool;

use crate::catalog::SchemaIntrospector;
use crate::error::AppError;
use crate::sql::{Dialect, Statement};
use async_trait::async_trait;
use serde_json::{Map, Value};

/// One result row: column name → value.
pub type ResultRow = Map<String, Value>;

/// Runs built statements. Every call is its own auto-committed unit of work.
#[async_trait]
pub trait StatementExecutor: Send + Sync {
    /// Run a read and materialize its rows in result-set order.
    async fn fetch_rows(&self, statement: &Statement) -> Result<Vec<ResultRow>, AppError>;

    /// Run a write and return the number of affected rows.
    async fn execute(&self, statement: &Statement) -> Result<u64, AppError>;

    async fn ping(&self) -> Result<(), AppError>;
}

/// A database the gateway can serve: catalog, executor and SQL dialect together.
pub trait Backend: SchemaIntrospector + StatementExecutor {
    fn dialect(&self) -> Dialect;
}

impl Backend for DbPool {
    fn dialect(&self) -> Dialect {
        match self {
            DbPool::Postgres(_) => Dialect::Postgres,
            DbPool::MySql(_) => Dialect::MySql,
            DbPool::Sqlite(_) => Dialect::Sqlite,
        }
    }
}
