//! Shared application state for all routes.

use crate::catalog::ResolutionPolicy;
use crate::db::Backend;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub backend: Arc<dyn Backend>,
    /// How bare table names shared by several schemas are resolved.
    pub resolution: ResolutionPolicy,
}

impl AppState {
    pub fn new(backend: impl Backend + 'static, resolution: ResolutionPolicy) -> Self {
        AppState {
            backend: Arc::new(backend),
            resolution,
        }
    }
}
