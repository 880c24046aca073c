use altruist_service::ops::post::{self, CreatePost};
use altruist_service::Backend;
use axum::extract::{Path, State};
use axum::http::StatusCode;

use crate::error::ApiError;
use crate::extract::JsonBody;
use crate::response::Reply;

const NO_POSTS: &str = "This foundation does not have posts yet";

pub async fn create_post<B: Backend>(
    State(backend): State<B>,
    JsonBody(request): JsonBody<CreatePost>,
) -> Result<Reply, ApiError> {
    let post = post::create_post(&backend, request).await?;
    Ok(Reply::created("Create post successfully").with("post", &post))
}

// An empty result is a 404 that still reports success, as existing clients expect.
pub async fn get_posts_by_foundation_name<B: Backend>(
    State(backend): State<B>,
    Path(name_foundation): Path<String>,
) -> Result<Reply, ApiError> {
    let results = post::posts_by_foundation_name(&backend, &name_foundation)?;
    if results.is_empty() {
        return Ok(Reply::ok(NO_POSTS).status(StatusCode::NOT_FOUND));
    }
    Ok(Reply::ok("Post searching successfully").with("results", &results))
}

pub async fn get_posts_by_foundation_wallet<B: Backend>(
    State(backend): State<B>,
    Path(eth_address): Path<String>,
) -> Result<Reply, ApiError> {
    let results = post::posts_by_wallet(&backend, &eth_address)?;
    if results.is_empty() {
        return Ok(Reply::ok(NO_POSTS).status(StatusCode::NOT_FOUND));
    }
    Ok(Reply::ok("Post searching successfully").with("results", &results))
}
