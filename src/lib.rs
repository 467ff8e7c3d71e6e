//! Tablegate: a generic HTTP CRUD gateway over any table of a relational database.
//!
//! Tables are addressed by bare name; the owning schema is found by live catalog
//! introspection and every statement is built from the introspected description.

pub mod catalog;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod response;
pub mod routes;
pub mod service;
pub mod sql;
pub mod state;

#[cfg(test)]
pub(crate) mod test_support;

pub use catalog::{ResolutionPolicy, SchemaIntrospector, TableReference, TableResolver};
pub use config::{load_from_env, load_with, BackendKind, ConnectionSettings, GatewayConfig};
pub use db::{Backend, DbPool, ResultRow, StatementExecutor};
pub use error::{AppError, ConfigError};
pub use routes::{common_routes_with_ready, gateway_router, table_routes};
pub use service::{CrudService, TableTarget};
pub use state::AppState;
