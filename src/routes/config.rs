//! Provider config routes.

use crate::handlers::providers::{get_active_provider, get_provider, list_providers, switch_provider};
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn config_routes(state: AppState) -> Router {
    Router::new()
        .route("/config/provider", get(get_active_provider).put(switch_provider))
        .route("/config/providers", get(list_providers))
        .route("/config/providers/:provider_id", get(get_provider))
        .with_state(state)
}
