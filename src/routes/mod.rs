//! Router assembly.

mod common;
mod table;

pub use common::common_routes_with_ready;
pub use table::table_routes;

use crate::state::AppState;
use axum::Router;
use tower_http::trace::TraceLayer;

/// The full gateway: table routes, health/readiness/version, request tracing.
pub fn gateway_router(state: AppState, body_limit: usize) -> Router {
    Router::new()
        .merge(table_routes(state.clone(), body_limit))
        .merge(common_routes_with_ready(state))
        .layer(TraceLayer::new_for_http())
}
