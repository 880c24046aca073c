use altruist_service::ops::cause::{self, CreateCause, DeploymentEvent};
use altruist_service::ops::step;
use altruist_service::Backend;
use axum::body::Bytes;
use axum::extract::{Path, State};
use serde::Deserialize;

use crate::error::ApiError;
use crate::extract::JsonBody;
use crate::response::Reply;

/// Optional body of the cause lookup: who is looking.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Viewer {
    pub eth_address: Option<String>,
}

pub async fn create_cause_by_wallet<B: Backend>(
    State(backend): State<B>,
    JsonBody(request): JsonBody<CreateCause>,
) -> Result<Reply, ApiError> {
    let cause = cause::create_cause(&backend, request).await?;
    Ok(Reply::created("Create cause successfully").with("cause", &cause))
}

/// Causes of `wallet`. The body may name the viewer; an empty body is an anonymous visitor.
pub async fn get_cause_by_wallet<B: Backend>(
    State(backend): State<B>,
    Path(wallet): Path<String>,
    body: Bytes,
) -> Result<Reply, ApiError> {
    let viewer: Viewer = if body.iter().all(u8::is_ascii_whitespace) {
        Viewer::default()
    } else {
        serde_json::from_slice(&body).map_err(|e| ApiError::BadRequest(e.to_string()))?
    };

    let causes = cause::causes_by_wallet(&backend, &wallet, viewer.eth_address.as_deref())?;
    Ok(Reply::ok("cause searched successfully").with("causes", &causes))
}

pub async fn get_steps_by_address<B: Backend>(
    State(backend): State<B>,
    Path(address): Path<String>,
) -> Result<Reply, ApiError> {
    let steps = step::steps_by_contract(&backend, &address)?;
    if steps.is_empty() {
        return Ok(Reply::ok("Steps not found").unsuccessful().with("steps", &steps));
    }
    Ok(Reply::ok("steps searched successfully").with("steps", &steps))
}

pub async fn register_deployment<B: Backend>(
    State(backend): State<B>,
    JsonBody(event): JsonBody<DeploymentEvent>,
) -> Result<Reply, ApiError> {
    let object_id = cause::record_deployment(&backend, event)?;
    Ok(Reply::created("Deployment recorded").with("objectId", &object_id))
}
