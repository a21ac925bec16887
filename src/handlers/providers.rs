//! Provider inspection and runtime switching.

use crate::config::ProviderConfig;
use crate::error::AppError;
use crate::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use serde::{Deserialize, Serialize};

#[derive(Serialize)]
pub struct ActiveProviderBody {
    pub provider: String,
    pub config: ProviderConfig,
}

#[derive(Deserialize)]
pub struct SwitchProvider {
    pub provider: String,
}

fn lock_error() -> AppError {
    AppError::Internal("provider lock poisoned".into())
}

pub async fn get_active_provider(State(state): State<AppState>) -> Result<Json<ActiveProviderBody>, AppError> {
    let providers = state.providers.read().map_err(|_| lock_error())?;
    let config = providers.get_config()?.clone();
    Ok(Json(ActiveProviderBody {
        provider: providers.active_id().to_string(),
        config,
    }))
}

pub async fn list_providers(State(state): State<AppState>) -> Result<Json<Vec<ProviderConfig>>, AppError> {
    let providers = state.providers.read().map_err(|_| lock_error())?;
    Ok(Json(providers.registry().configs().cloned().collect()))
}

pub async fn get_provider(
    State(state): State<AppState>,
    Path(provider_id): Path<String>,
) -> Result<Json<ProviderConfig>, AppError> {
    let providers = state.providers.read().map_err(|_| lock_error())?;
    Ok(Json(providers.registry().get_config(&provider_id)?.clone()))
}

pub async fn switch_provider(
    State(state): State<AppState>,
    payload: Result<Json<SwitchProvider>, JsonRejection>,
) -> Result<Json<ActiveProviderBody>, AppError> {
    let Json(body) = payload?;
    let mut providers = state.providers.write().map_err(|_| lock_error())?;
    let previous = providers.active_id().to_string();
    let config = providers.switch_to(&body.provider)?.clone();
    tracing::info!(from = %previous, to = %body.provider, table = %config.table_name, "active provider switched");
    Ok(Json(ActiveProviderBody {
        provider: body.provider,
        config,
    }))
}
