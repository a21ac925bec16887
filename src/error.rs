//! Typed errors and HTTP mapping.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing environment variable: {0} (required to start)")]
    MissingEnv(&'static str),
    #[error("invalid value for {name}: {reason}")]
    InvalidEnv { name: &'static str, reason: String },
    #[error("unknown provider: '{0}'")]
    UnknownProvider(String),
    #[error("store client init: {0}")]
    ClientInit(String),
}

/// Failures of the backing store, relayed to callers as a message string.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Store answered with a non-success status.
    #[error("{message}")]
    Upstream { status: u16, message: String },
    #[error("transport: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("database: {0}")]
    Db(#[from] sqlx::Error),
    #[error("unexpected store response: {0}")]
    Decode(String),
}

impl StoreError {
    /// HTTP status the store answered with, when it answered at all.
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            StoreError::Upstream { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("bad request: {0}")]
    BadRequest(String),
    /// Body that axum could not read as JSON; keeps the rejection's own status.
    #[error("{}", .0.body_text())]
    Body(#[from] JsonRejection),
    #[error("internal: {0}")]
    Internal(String),
}

/// Error body shared by every endpoint: `{"detail": "..."}`.
#[derive(Serialize)]
pub struct DetailBody {
    pub detail: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Config(ConfigError::UnknownProvider(_)) => StatusCode::NOT_FOUND,
            AppError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Store(_) => StatusCode::BAD_REQUEST,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Body(rejection) => rejection.status(),
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let upstream_status = match &self {
            AppError::Store(e) => e.upstream_status(),
            _ => None,
        };
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::warn!(error = %self, upstream_status = ?upstream_status, "request rejected");
        }
        let body = DetailBody {
            detail: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

/// Fixed companion text of the legacy list error body.
pub const LEGACY_LIST_ERROR_TEXT: &str = "Error al acceder a la tabla";

/// Legacy list failure: reported with a 200 status and `{"error", "mensaje"}` body.
pub fn legacy_list_error(err: &AppError) -> Response {
    let upstream_status = match err {
        AppError::Store(e) => e.upstream_status(),
        _ => None,
    };
    tracing::warn!(error = %err, upstream_status = ?upstream_status, "list failed (legacy 200 response)");
    (
        StatusCode::OK,
        Json(serde_json::json!({
            "error": err.to_string(),
            "mensaje": LEGACY_LIST_ERROR_TEXT,
        })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(resp: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn upstream_error_maps_to_400_with_detail() {
        let err = AppError::Store(StoreError::Upstream {
            status: 409,
            message: "duplicate key value violates unique constraint".into(),
        });
        let resp = err.into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body = body_json(resp).await;
        assert_eq!(body["detail"], "duplicate key value violates unique constraint");
    }

    #[test]
    fn upstream_status_only_for_store_answers() {
        let answered = StoreError::Upstream {
            status: 404,
            message: "relation \"public.nope\" does not exist".into(),
        };
        assert_eq!(answered.upstream_status(), Some(404));
        assert_eq!(StoreError::Decode("x".into()).upstream_status(), None);
    }

    #[tokio::test]
    async fn unknown_provider_maps_to_404() {
        let resp = AppError::Config(ConfigError::UnknownProvider("oracle".into())).into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body = body_json(resp).await;
        assert_eq!(body["detail"], "unknown provider: 'oracle'");
    }

    #[tokio::test]
    async fn legacy_list_error_keeps_200() {
        let err = AppError::Store(StoreError::Decode("boom".into()));
        let resp = legacy_list_error(&err);
        assert_eq!(resp.status(), StatusCode::OK);
        let body = body_json(resp).await;
        assert_eq!(body["error"], "unexpected store response: boom");
        assert_eq!(body["mensaje"], LEGACY_LIST_ERROR_TEXT);
    }
}
