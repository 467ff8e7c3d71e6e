//! Table CRUD routes. The table is named in the body, so paths are fixed.

use crate::handlers::table::{add_record, delete_record, read_table, update_record};
use crate::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, post, put},
    Router,
};
use tower_http::limit::RequestBodyLimitLayer;

pub fn table_routes(state: AppState, body_limit: usize) -> Router {
    Router::new()
        .route("/read_table", post(read_table))
        .route("/add_record", post(add_record))
        .route("/update_record", put(update_record))
        .route("/delete_record", delete(delete_record))
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(body_limit))
        .with_state(state)
}
