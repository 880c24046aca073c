use axum::extract::FromRequest;

use crate::error::ApiError;

/// A JSON request body whose rejection renders as [`ApiError::BadRequest`].
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct JsonBody<T>(pub T);
