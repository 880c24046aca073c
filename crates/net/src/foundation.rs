use altruist_service::ops::foundation::{self, CreateFoundation};
use altruist_service::Backend;
use axum::extract::{Path, State};

use crate::error::ApiError;
use crate::extract::JsonBody;
use crate::response::Reply;

pub async fn create_foundation<B: Backend>(
    State(backend): State<B>,
    JsonBody(request): JsonBody<CreateFoundation>,
) -> Result<Reply, ApiError> {
    let foundation = foundation::create_foundation(&backend, request).await?;
    Ok(Reply::created("Create foundation successfully").with("foundation", &foundation))
}

pub async fn get_foundations<B: Backend>(State(backend): State<B>) -> Result<Reply, ApiError> {
    let foundations = foundation::list_foundations(&backend)?;
    Ok(Reply::ok("Foundations searched successfully").with("foundations", &foundations))
}

pub async fn get_foundation_by_email<B: Backend>(
    State(backend): State<B>,
    Path(email): Path<String>,
) -> Result<Reply, ApiError> {
    match foundation::foundation_by_email(&backend, &email)? {
        Some(found) => Ok(Reply::ok("Foundation searched successfully").with("foundation", &found)),
        None => Err(ApiError::NotFound(format!("No foundation registered with email {email}"))),
    }
}

pub async fn get_foundation_by_wallet<B: Backend>(
    State(backend): State<B>,
    Path(wallet): Path<String>,
) -> Result<Reply, ApiError> {
    match foundation::foundation_by_wallet(&backend, &wallet)? {
        Some(found) => Ok(Reply::ok("Foundation searched successfully").with("foundation", &found)),
        None => Err(ApiError::NotFound(format!("No foundation registered for wallet {wallet}"))),
    }
}
