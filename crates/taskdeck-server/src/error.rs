//! API error mapping to HTTP responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use log::error;
use serde::Serialize;
use taskdeck_core::StoreError;

/// JSON error payload returned to clients.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Client-facing API failures.
#[derive(Debug)]
pub enum ApiError {
    /// Missing or malformed request input. Reported as 400.
    InvalidRequest(String),
    /// Referenced task does not exist. Reported as 404.
    NotFound,
    /// Store failure. Reported as 500 with a generic message; the
    /// underlying error is logged and never leaked.
    Storage(String),
}

impl ApiError {
    /// Wrap a store failure under a generic per-operation message.
    pub fn storage(message: &str, err: StoreError) -> Self {
        error!("store operation failed: {err}");
        ApiError::Storage(message.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::InvalidRequest(message) => (StatusCode::BAD_REQUEST, message),
            ApiError::NotFound => (StatusCode::NOT_FOUND, "Task not found".to_string()),
            ApiError::Storage(message) => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };
        (status, Json(ErrorBody { error: message })).into_response()
    }
}
