//! Record routes: default table, named table, and forwarded records.

use crate::handlers::records::{create_default, list_default, list_table, process};
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};

pub fn record_routes(state: AppState) -> Router {
    Router::new()
        .route("/pollos", get(list_default).post(create_default))
        .route("/datos/:table", get(list_table))
        .route("/procesar", post(process))
        .with_state(state)
}
