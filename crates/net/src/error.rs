use altruist_service::ServiceError;
use altruist_storage::StorageError;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use std::fmt;
use tracing::{error, warn};

/// Failure of a route, rendered as `{"success": false, "message": ...}`.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    NotFound(String),
    Conflict(String),
    /// Object storage or chain node failed.
    Upstream(String),
    Internal(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::BadRequest(msg) => write!(f, "{msg}"),
            ApiError::NotFound(msg) => write!(f, "{msg}"),
            ApiError::Conflict(msg) => write!(f, "{msg}"),
            ApiError::Upstream(msg) => write!(f, "upstream error: {msg}"),
            ApiError::Internal(msg) => write!(f, "internal error: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<ServiceError> for ApiError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::Validation(msg) => ApiError::BadRequest(msg),
            ServiceError::NotFound(msg) => ApiError::NotFound(msg),
            ServiceError::Conflict(msg) => ApiError::Conflict(msg),
            ServiceError::Storage(StorageError::NotFound(msg)) => ApiError::NotFound(msg),
            ServiceError::Storage(StorageError::InvalidAddress(msg)) => ApiError::BadRequest(msg),
            ServiceError::Storage(StorageError::InvalidEncoding(msg)) => ApiError::BadRequest(msg),
            ServiceError::Storage(StorageError::Database(e)) => ApiError::Internal(e.to_string()),
            ServiceError::Storage(e) => ApiError::Upstream(e.to_string()),
            ServiceError::Chain(e) => ApiError::Upstream(e.to_string()),
            ServiceError::Database(e) => ApiError::Internal(e.to_string()),
            ServiceError::Serialization(e) => ApiError::Internal(e.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Upstream(_) => StatusCode::BAD_GATEWAY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            error!(status = status.as_u16(), error = %self, "request failed");
        } else {
            warn!(status = status.as_u16(), error = %self, "request rejected");
        }

        let body = serde_json::json!({
            "success": false,
            "message": self.to_string()
        });
        (status, Json(body)).into_response()
    }
}
