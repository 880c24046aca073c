//! Decorates NFT records with their metadata, owning cause and foundation, and the
//! marketplace listing read from chain.

use altruist_chain::{Address, ChainError, Listing, MarketReader, U256};
use altruist_database::Stored;
use altruist_storage::{ContentAddress, ObjectStorage, StorageError};
use tracing::warn;

use crate::context::Backend;
use crate::parser::cause::{Cause, Market, NFT_CONTRACT};
use crate::parser::foundation::Foundation;
use crate::parser::metadata::NftMetadata;
use crate::parser::nft::{EnrichedNft, Nft};
use crate::ServiceError;

/// How many records the "newest" view returns.
pub const NEWEST_LIMIT: usize = 12;

/// What a failed gateway fetch or chain read does to the response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tolerance {
    /// Collection views: the failing record degrades to null metadata and an unlisted status.
    Batch,
    /// Single-record views: the failure is returned.
    Strict,
}

/// Newest first. Records created in the same instant keep insertion order reversed.
pub fn sort_newest_first(nfts: &mut [Stored<Nft>]) {
    nfts.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| b.object_id.cmp(&a.object_id))
    });
}

/// `(status, price)` of a listing: unlisted tokens are `(false, 0)`.
pub fn listing_status(listing: &Listing) -> (bool, f64) {
    if listing.is_listed() {
        (true, listing.price_in_ether())
    } else {
        (false, 0.0)
    }
}

pub async fn fetch_metadata<S: ObjectStorage>(objects: &S, token_uri: &str) -> Result<NftMetadata, StorageError> {
    let address = ContentAddress::from_locator(token_uri)?;
    let bytes = objects.fetch(&address).await?;
    serde_json::from_slice(&bytes).map_err(|e| StorageError::InvalidEncoding(format!("metadata {address}: {e}")))
}

async fn read_listing<M: MarketReader>(market: &M, marketplace: &str, nft: &Nft) -> Result<Listing, ChainError> {
    let marketplace: Address = marketplace
        .parse()
        .map_err(|_| ChainError::InvalidAddress(marketplace.to_string()))?;
    let contract: Address = nft
        .nft_contract
        .parse()
        .map_err(|_| ChainError::InvalidAddress(nft.nft_contract.clone()))?;
    let token_id = U256::from_str_radix(&nft.uid, 10).map_err(|_| ChainError::InvalidTokenId(nft.uid.clone()))?;
    market.get_listing(&marketplace, &contract, token_id).await
}

/// Enriches `nfts` one record at a time, keeping their order.
pub async fn enrich_nfts<B: Backend>(
    backend: &B,
    nfts: Vec<Stored<Nft>>,
    tolerance: Tolerance,
) -> Result<Vec<EnrichedNft>, ServiceError> {
    let records = backend.records();
    let joined = records.lookup::<Nft, Cause>(nfts, NFT_CONTRACT, "contractAddress")?;

    let mut enriched = Vec::with_capacity(joined.len());
    for (nft, causes) in joined {
        let cause = causes.into_iter().next();
        enriched.push(decorate(backend, nft, cause, tolerance).await?);
    }

    Ok(enriched)
}

async fn decorate<B: Backend>(
    backend: &B,
    nft: Stored<Nft>,
    cause: Option<Stored<Cause>>,
    tolerance: Tolerance,
) -> Result<EnrichedNft, ServiceError> {
    let records = backend.records();

    let metadata = match fetch_metadata(backend.objects(), &nft.token_uri).await {
        Ok(metadata) => Some(metadata),
        Err(e) if tolerance == Tolerance::Batch => {
            warn!(object_id = %nft.object_id, token_uri = %nft.token_uri, error = %e, "metadata unavailable");
            None
        }
        Err(e) => return Err(e.into()),
    };

    let foundation = match &cause {
        Some(cause) => records.first::<Foundation>("ethAddress", cause.nft_artist.as_str())?,
        None => None,
    };

    let market = records.first::<Market>(NFT_CONTRACT, nft.nft_contract.as_str())?;
    let (status, price) = match &market {
        Some(market) => match read_listing(backend.market(), &market.marketplace_address, &nft).await {
            Ok(listing) => listing_status(&listing),
            Err(e) if tolerance == Tolerance::Batch => {
                warn!(object_id = %nft.object_id, error = %e, "listing unavailable");
                (false, 0.0)
            }
            Err(e) => return Err(e.into()),
        },
        None => (false, 0.0),
    };

    let (title, description, img) = match metadata {
        Some(metadata) => (Some(metadata.name), Some(metadata.description), Some(metadata.animation_url)),
        None => (None, None, None),
    };

    Ok(EnrichedNft {
        nft,
        title,
        description,
        img,
        cause,
        foundation,
        market_address: market.map(|market| market.record.marketplace_address),
        status,
        price,
    })
}
