use altruist_service::ops::step::{self, CreateStep};
use altruist_service::Backend;
use axum::extract::{Path, State};

use crate::error::ApiError;
use crate::extract::JsonBody;
use crate::response::Reply;

/// The first step a wallet recorded.
pub async fn get_steps_by_wallet<B: Backend>(
    State(backend): State<B>,
    Path(wallet): Path<String>,
) -> Result<Reply, ApiError> {
    match step::first_step_by_wallet(&backend, &wallet)? {
        Some(found) => Ok(Reply::ok("steps searched successfully").with("steps", &found)),
        None => Ok(Reply::ok("Steps not found").unsuccessful()),
    }
}

pub async fn create_step<B: Backend>(
    State(backend): State<B>,
    JsonBody(request): JsonBody<CreateStep>,
) -> Result<Reply, ApiError> {
    let step = step::create_step(&backend, request)?;
    Ok(Reply::created("Create step successfully").with("step", &step))
}
