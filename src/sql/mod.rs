//! Safe SQL builder: identifiers from the catalog only, values as parameters.

mod builder;
mod dialect;
pub mod params;
pub use builder::*;
pub use dialect::Dialect;
pub use params::*;
