//! Record handlers: each one selects a table and makes a single store call.

use crate::error::{legacy_list_error, AppError};
use crate::state::AppState;
use crate::store::{Record, TableRef};
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;

/// Field of a processed record that names its target table.
pub const TABLE_FIELD: &str = "tabla";
/// Target of processed records that carry no table field.
pub const DEFAULT_PROCESS_TABLE: &str = "resultados";

pub const STATUS_MESSAGE: &str = "API funcionando correctamente";

/// Table named by the record's `tabla` field, or `resultados`. Non-string values are ignored.
pub fn process_target_table(record: &Record) -> &str {
    record
        .get(TABLE_FIELD)
        .and_then(Value::as_str)
        .unwrap_or(DEFAULT_PROCESS_TABLE)
}

fn body_to_record(value: Value) -> Result<Record, AppError> {
    match value {
        Value::Object(m) => Ok(m),
        _ => Err(AppError::BadRequest("body must be a JSON object".into())),
    }
}

/// Table of the active provider, in its schema. The lock is released before any store call.
pub(crate) fn active_table(state: &AppState) -> Result<TableRef, AppError> {
    let providers = state
        .providers
        .read()
        .map_err(|_| AppError::Internal("provider lock poisoned".into()))?;
    let config = providers.get_config()?;
    Ok(TableRef::new(config.table_name.clone()).in_schema(config.schema()))
}

/// `name` placed in the active provider's schema.
pub(crate) fn table_in_active_schema(state: &AppState, name: &str) -> Result<TableRef, AppError> {
    let providers = state
        .providers
        .read()
        .map_err(|_| AppError::Internal("provider lock poisoned".into()))?;
    Ok(TableRef::new(name).in_schema(providers.get_config()?.schema()))
}

pub async fn root() -> Json<Value> {
    Json(serde_json::json!({ "message": STATUS_MESSAGE }))
}

async fn select_default(state: &AppState) -> Result<Vec<Value>, AppError> {
    let table = active_table(state)?;
    Ok(state.store.select_all(&table).await?)
}

pub async fn list_default(State(state): State<AppState>) -> Response {
    match select_default(&state).await {
        Ok(rows) => Json(rows).into_response(),
        Err(err) if state.legacy_list_errors => legacy_list_error(&err),
        Err(err) => err.into_response(),
    }
}

pub async fn create_default(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    let Json(body) = payload?;
    let record = body_to_record(body)?;
    let table = active_table(&state)?;
    let inserted = state.store.insert(&table, &record).await?;
    Ok(Json(inserted))
}

pub async fn list_table(
    State(state): State<AppState>,
    Path(table): Path<String>,
) -> Result<Json<Vec<Value>>, AppError> {
    let table = table_in_active_schema(&state, &table)?;
    let rows = state.store.select_all(&table).await?;
    Ok(Json(rows))
}

/// Inserts the body verbatim, `tabla` field included.
pub async fn process(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    let Json(body) = payload?;
    let record = body_to_record(body)?;
    let table = table_in_active_schema(&state, process_target_table(&record))?;
    let inserted = state.store.insert(&table, &record).await?;
    Ok(Json(inserted))
}
