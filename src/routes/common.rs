//! Common routes: status, readiness, version.

use crate::handlers::records::{active_table, root};
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::Serialize;

#[derive(Serialize)]
struct ReadyBody {
    status: &'static str,
    store: &'static str,
}

/// Readiness: one cheap read against the active provider's table.
async fn ready(State(state): State<AppState>) -> (StatusCode, Json<ReadyBody>) {
    let reachable = match active_table(&state) {
        Ok(table) => match state.store.ping(&table).await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(error = %e, table = %table.name, "store not ready");
                false
            }
        },
        Err(e) => {
            tracing::warn!(error = %e, "no active table");
            false
        }
    };
    if reachable {
        (StatusCode::OK, Json(ReadyBody { status: "ok", store: "ok" }))
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ReadyBody {
                status: "degraded",
                store: "unavailable",
            }),
        )
    }
}

async fn version() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// GET / (status message, never touches the store), GET /ready, GET /version.
pub fn common_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/ready", get(ready))
        .route("/version", get(version))
        .with_state(state)
}
