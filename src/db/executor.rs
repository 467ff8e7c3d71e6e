//! Statement execution against the pool. Each call checks a connection out for its
//! duration only; sqlx returns it to the pool on every exit path.

use super::{decode, DbPool, ResultRow, StatementExecutor};
use crate::error::AppError;
use crate::sql::{SqlValue, Statement};
use async_trait::async_trait;

macro_rules! bind_params {
    ($db:ty, $statement:expr) => {{
        let mut query = sqlx::query::<$db>(&$statement.sql);
        for value in &$statement.params {
            query = match value {
                SqlValue::Null => query.bind(None::<String>),
                SqlValue::Int(n) => query.bind(*n),
                SqlValue::Float(f) => query.bind(*f),
                SqlValue::Text(s) => query.bind(s.as_str()),
                SqlValue::Bool(b) => query.bind(*b),
                SqlValue::Bytes(b) => query.bind(b.as_slice()),
            };
        }
        query
    }};
}

#[async_trait]
impl StatementExecutor for DbPool {
    async fn fetch_rows(&self, statement: &Statement) -> Result<Vec<ResultRow>, AppError> {
        tracing::debug!(sql = %statement.sql, params = ?statement.params, "query");
        let rows = match self {
            DbPool::Postgres(p) => {
                let rows = bind_params!(sqlx::Postgres, statement).fetch_all(p).await?;
                rows.iter().map(decode::pg_row).collect::<Result<Vec<_>, _>>()?
            }
            DbPool::MySql(p) => {
                let rows = bind_params!(sqlx::MySql, statement).fetch_all(p).await?;
                rows.iter().map(decode::mysql_row).collect::<Result<Vec<_>, _>>()?
            }
            DbPool::Sqlite(p) => {
                let rows = bind_params!(sqlx::Sqlite, statement).fetch_all(p).await?;
                rows.iter().map(decode::sqlite_row).collect::<Result<Vec<_>, _>>()?
            }
        };
        Ok(rows)
    }

    async fn execute(&self, statement: &Statement) -> Result<u64, AppError> {
        tracing::debug!(sql = %statement.sql, params = ?statement.params, "execute");
        let affected = match self {
            DbPool::Postgres(p) => bind_params!(sqlx::Postgres, statement).execute(p).await?.rows_affected(),
            DbPool::MySql(p) => bind_params!(sqlx::MySql, statement).execute(p).await?.rows_affected(),
            DbPool::Sqlite(p) => bind_params!(sqlx::Sqlite, statement).execute(p).await?.rows_affected(),
        };
        tracing::debug!(affected, kind = ?statement.kind, "statement done");
        Ok(affected)
    }

    async fn ping(&self) -> Result<(), AppError> {
        match self {
            DbPool::Postgres(p) => {
                sqlx::query("SELECT 1").execute(p).await?;
            }
            DbPool::MySql(p) => {
                sqlx::query("SELECT 1").execute(p).await?;
            }
            DbPool::Sqlite(p) => {
                sqlx::query("SELECT 1").execute(p).await?;
            }
        }
        Ok(())
    }
}
