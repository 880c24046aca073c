use altruist_service::ops::nft::{self, NftDraft, RegisterNft, TradeNft};
use altruist_service::Backend;
use axum::extract::{Path, State};
use serde::Deserialize;

use crate::error::ApiError;
use crate::extract::JsonBody;
use crate::response::Reply;

#[derive(Debug, Deserialize)]
pub struct CollectionRequest {
    #[serde(default)]
    pub collection: Vec<NftDraft>,
}

pub async fn create_one_nft<B: Backend>(
    State(backend): State<B>,
    JsonBody(draft): JsonBody<NftDraft>,
) -> Result<Reply, ApiError> {
    let asset = nft::create_one_nft(&backend, draft).await?;
    Ok(Reply::created("NFT created successfully")
        .with("metadata", &asset.metadata)
        .with("image", &asset.animation_url))
}

pub async fn create_collection_nfts<B: Backend>(
    State(backend): State<B>,
    JsonBody(request): JsonBody<CollectionRequest>,
) -> Result<Reply, ApiError> {
    let collection = nft::create_collection(&backend, request.collection).await?;
    Ok(Reply::created("Collection created successfully").with("collection", &collection))
}

pub async fn register_nft<B: Backend>(
    State(backend): State<B>,
    JsonBody(request): JsonBody<RegisterNft>,
) -> Result<Reply, ApiError> {
    let nft = nft::register_nft(&backend, request)?;
    Ok(Reply::created("NFT registered successfully").with("nft", &nft))
}

pub async fn get_newest_nfts<B: Backend>(State(backend): State<B>) -> Result<Reply, ApiError> {
    let nfts = nft::newest_nfts(&backend).await?;
    Ok(Reply::ok("NFTs searched successfully").with("nfts", &nfts))
}

pub async fn get_nfts_from_cause<B: Backend>(
    State(backend): State<B>,
    Path(address): Path<String>,
) -> Result<Reply, ApiError> {
    let nfts = nft::nfts_from_cause(&backend, &address).await?;
    Ok(Reply::ok("NFTs searched successfully").with("nfts", &nfts))
}

/// One token. An unknown token is a successful reply with a null `nft`.
pub async fn get_nfts_from_address_and_token_id<B: Backend>(
    State(backend): State<B>,
    Path((address, id)): Path<(String, String)>,
) -> Result<Reply, ApiError> {
    let found = nft::nft_by_address_and_token(&backend, &address, &id).await?;
    let message = if found.is_some() { "NFT searched successfully" } else { "NFT not found" };
    Ok(Reply::ok(message).with("nft", &found))
}

pub async fn get_nfts_from_wallet<B: Backend>(
    State(backend): State<B>,
    Path(wallet): Path<String>,
) -> Result<Reply, ApiError> {
    let nfts = nft::nfts_from_wallet(&backend, &wallet).await?;
    Ok(Reply::ok("NFTs searched successfully").with("nfts", &nfts))
}

pub async fn trade_nft<B: Backend>(
    State(backend): State<B>,
    JsonBody(request): JsonBody<TradeNft>,
) -> Result<Reply, ApiError> {
    let nft = nft::trade_nft(&backend, request)?;
    Ok(Reply::ok("NFT traded successfully").with("nft", &nft))
}

pub async fn get_file<B: Backend>(
    State(backend): State<B>,
    Path(hash): Path<String>,
) -> Result<Reply, ApiError> {
    let data = nft::fetch_file(&backend, &hash).await?;
    Ok(Reply::ok("File retrieved successfully").with("data", &data))
}
