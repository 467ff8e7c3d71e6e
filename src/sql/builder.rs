//! Builds parameterized SELECT, INSERT, UPDATE, DELETE from an introspected table.
//!
//! Identifiers written into SQL text always come from the catalog description; caller
//! supplied keys are only used to look columns up. Every value is a bound parameter.

use super::{Dialect, SqlValue};
use crate::catalog::{ColumnDescriptor, TableSchema};
use crate::error::AppError;
use serde_json::{Map, Value};

/// Caller-supplied column → value mapping.
pub type RecordPayload = Map<String, Value>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatementKind {
    Read,
    Insert,
    Update,
    Delete,
}

/// One request-scoped statement: SQL text plus its parameters in placeholder order.
#[derive(Clone, Debug)]
pub struct Statement {
    pub kind: StatementKind,
    pub sql: String,
    pub params: Vec<SqlValue>,
}

struct StatementBuf {
    dialect: Dialect,
    params: Vec<SqlValue>,
}

impl StatementBuf {
    fn new(dialect: Dialect) -> Self {
        StatementBuf {
            dialect,
            params: Vec::new(),
        }
    }

    fn push_param(&mut self, v: SqlValue, column: &ColumnDescriptor) -> String {
        self.params.push(v);
        self.dialect.placeholder(self.params.len(), column)
    }

    fn finish(self, kind: StatementKind, sql: String) -> Statement {
        Statement {
            kind,
            sql,
            params: self.params,
        }
    }
}

/// Payload entries paired with their introspected columns, in table column order.
fn assignments<'t>(
    table: &'t TableSchema,
    payload: &RecordPayload,
) -> Result<Vec<(&'t ColumnDescriptor, SqlValue)>, AppError> {
    if let Some(unknown) = payload.keys().find(|k| table.column(k).is_none()) {
        return Err(AppError::Validation(format!(
            "column '{}' does not exist in table {}",
            unknown, table.reference
        )));
    }
    table
        .columns
        .iter()
        .filter_map(|c| payload.get(&c.name).map(|v| (c, v)))
        .map(|(c, v)| SqlValue::coerce(v, c).map(|value| (c, value)))
        .collect()
}

/// SELECT every column of every row; no filter, no ordering.
pub fn select_all(dialect: Dialect, table: &TableSchema) -> Statement {
    let cols = table
        .columns
        .iter()
        .map(|c| dialect.select_expr(c))
        .collect::<Vec<_>>()
        .join(", ");
    let sql = format!("SELECT {} FROM {}", cols, dialect.qualified(&table.reference));
    StatementBuf::new(dialect).finish(StatementKind::Read, sql)
}

/// INSERT one row from `payload`. The payload must name at least one column.
pub fn insert(dialect: Dialect, table: &TableSchema, payload: &RecordPayload) -> Result<Statement, AppError> {
    if payload.is_empty() {
        return Err(AppError::Validation("table_data must contain at least one column".into()));
    }
    let mut q = StatementBuf::new(dialect);
    let mut cols = Vec::new();
    let mut placeholders = Vec::new();
    for (column, value) in assignments(table, payload)? {
        cols.push(dialect.quote(&column.name));
        placeholders.push(q.push_param(value, column));
    }
    let sql = format!(
        "INSERT INTO {} ({}) VALUES ({})",
        dialect.qualified(&table.reference),
        cols.join(", "),
        placeholders.join(", ")
    );
    Ok(q.finish(StatementKind::Insert, sql))
}

/// UPDATE the row whose primary key equals `pk`, setting only the columns in `payload`.
pub fn update(
    dialect: Dialect,
    table: &TableSchema,
    pk: &Value,
    payload: &RecordPayload,
) -> Result<Statement, AppError> {
    let pk_column = table.primary_key_column()?;
    if payload.is_empty() {
        return Err(AppError::Validation("update_data must contain at least one column".into()));
    }
    let mut q = StatementBuf::new(dialect);
    let mut sets = Vec::new();
    for (column, value) in assignments(table, payload)? {
        let rhs = q.push_param(value, column);
        sets.push(format!("{} = {}", dialect.quote(&column.name), rhs));
    }
    let key = SqlValue::coerce(pk, pk_column)?;
    let key_ph = q.push_param(key, pk_column);
    let sql = format!(
        "UPDATE {} SET {} WHERE {} = {}",
        dialect.qualified(&table.reference),
        sets.join(", "),
        dialect.quote(&pk_column.name),
        key_ph
    );
    Ok(q.finish(StatementKind::Update, sql))
}

/// DELETE the row whose primary key equals `pk`.
pub fn delete(dialect: Dialect, table: &TableSchema, pk: &Value) -> Result<Statement, AppError> {
    let pk_column = table.primary_key_column()?;
    let mut q = StatementBuf::new(dialect);
    let key = SqlValue::coerce(pk, pk_column)?;
    let key_ph = q.push_param(key, pk_column);
    let sql = format!(
        "DELETE FROM {} WHERE {} = {}",
        dialect.qualified(&table.reference),
        dialect.quote(&pk_column.name),
        key_ph
    );
    Ok(q.finish(StatementKind::Delete, sql))
}
