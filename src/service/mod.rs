//! CrudService: resolve, describe, build and execute one table operation.

mod crud;
mod validation;
pub use crud::{CrudService, TableTarget};
pub use validation::RequestValidator;
