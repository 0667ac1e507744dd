//! HTTP error mapping.
//!
//! | Error | Status |
//! |---|---|
//! | `Validation` | 400 |
//! | `MethodNotAllowed` | 400 |
//! | `NotFound` | 404 |
//! | `Unexpected` | 500 |

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::registry::{RegistryError, StoreError};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("method not allowed: {0}")]
    MethodNotAllowed(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Unexpected(String),
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::Validation(message.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::MethodNotAllowed(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(path) => {
                ApiError::NotFound(format!("no route stored for path: {path}"))
            }
            other => ApiError::Unexpected(other.to_string()),
        }
    }
}

impl From<RegistryError> for ApiError {
    fn from(e: RegistryError) -> Self {
        match e {
            RegistryError::MethodNotAllowed(method) => ApiError::MethodNotAllowed(method),
        }
    }
}

impl From<std::io::Error> for ApiError {
    fn from(e: std::io::Error) -> Self {
        ApiError::Unexpected(e.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            ApiError::Unexpected(message) => {
                tracing::error!(error = %message, "Request failed");
            }
            other => {
                tracing::debug!(status = status.as_u16(), error = %other, "Request rejected");
            }
        }
        (status, Json(json!({"ok": false, "error": self.to_string()}))).into_response()
    }
}
