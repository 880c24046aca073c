use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::{Map, Value};

/// Success envelope: `{"success": true, "message": ..., <key>: <payload>}`.
pub struct Reply {
    status: StatusCode,
    success: bool,
    message: String,
    payload: Map<String, Value>,
}

impl Reply {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::OK,
            success: true,
            message: message.into(),
            payload: Map::new(),
        }
    }

    pub fn created(message: impl Into<String>) -> Self {
        Self { status: StatusCode::CREATED, ..Self::ok(message) }
    }

    pub fn status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    /// Marks a lookup that found nothing while keeping the request itself successful.
    pub fn unsuccessful(mut self) -> Self {
        self.success = false;
        self
    }

    pub fn with<T: Serialize>(mut self, key: &str, payload: &T) -> Self {
        // every payload type serializes infallibly (plain structs with string keys)
        let value = serde_json::to_value(payload).unwrap_or(Value::Null);
        self.payload.insert(key.to_string(), value);
        self
    }
}

impl IntoResponse for Reply {
    fn into_response(self) -> Response {
        let mut body = self.payload;
        body.insert("success".to_string(), Value::Bool(self.success));
        body.insert("message".to_string(), Value::String(self.message));
        (self.status, Json(Value::Object(body))).into_response()
    }
}
