use altruist_database::Stored;
use altruist_storage::encoding::{encode_base64, upload_base64};
use altruist_storage::{ContentAddress, ObjectStorage};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use crate::address::{normalize, require_address, require_token_id};
use crate::context::Backend;
use crate::enrich::nft::{enrich_nfts, sort_newest_first, Tolerance, NEWEST_LIMIT};
use crate::error::require;
use crate::parser::cause::NFT_CONTRACT;
use crate::parser::metadata::NftMetadata;
use crate::parser::nft::{EnrichedNft, Nft};
use crate::ServiceError;

/// One asset to pin: its image plus the metadata document pointing at it.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct NftDraft {
    pub name: Option<String>,
    pub description: Option<String>,
    pub file: Option<String>,           // base64
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MintedAsset {
    pub metadata: ContentAddress,
    pub animation_url: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterNft {
    pub contract_address: Option<String>,
    pub token_id: Option<String>,
    pub token_uri: Option<String>,
    pub owner: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeNft {
    pub eth_address: Option<String>,
    pub token_id: Option<String>,
    pub contract_address: Option<String>,
}

/// Pins the image, then a metadata document whose `animation_url` is the image's gateway URL.
pub async fn create_one_nft<B: Backend>(backend: &B, draft: NftDraft) -> Result<MintedAsset, ServiceError> {
    let name = require(draft.name, "name")?;
    let description = require(draft.description, "description")?;
    let file = require(draft.file, "file")?;

    let objects = backend.objects();
    let image = upload_base64(objects, &name, &file).await?;
    let animation_url = objects.url(&image);

    let metadata = NftMetadata { name, description, animation_url: animation_url.clone() };
    let document = serde_json::to_vec(&metadata)?;
    let metadata = objects.put(&format!("{}_collection.json", metadata.name), document).await?;

    info!(metadata = %metadata, image = %image, "nft assets pinned");
    Ok(MintedAsset { metadata, animation_url })
}

/// Pins every draft in order. Every draft is validated before the first upload; an upload
/// failure stops the batch and earlier uploads stay pinned.
pub async fn create_collection<B: Backend>(backend: &B, drafts: Vec<NftDraft>) -> Result<Vec<MintedAsset>, ServiceError> {
    if drafts.is_empty() {
        return Err(ServiceError::Validation("Missing parameter: collection".to_string()));
    }
    for (index, draft) in drafts.iter().enumerate() {
        for (field, value) in [("name", &draft.name), ("description", &draft.description), ("file", &draft.file)] {
            if value.as_deref().map_or(true, |value| value.trim().is_empty()) {
                return Err(ServiceError::Validation(format!("Missing parameter: collection[{index}].{field}")));
            }
        }
    }

    let mut minted = Vec::with_capacity(drafts.len());
    for draft in drafts {
        minted.push(create_one_nft(backend, draft).await?);
    }
    Ok(minted)
}

/// Mirrors a minted token into the record store, once per `(contract, tokenId)`.
pub fn register_nft<B: Backend>(backend: &B, request: RegisterNft) -> Result<Stored<Nft>, ServiceError> {
    let nft_contract = require_address(request.contract_address, "contractAddress")?;
    let uid = require_token_id(request.token_id, "tokenId")?;
    let token_uri = require(request.token_uri, "tokenUri")?;
    let owner = normalize(&require(request.owner, "owner")?);

    let record = Nft { nft_contract, uid, token_uri, owner };
    let Some(nft) = backend.records().insert_unique(record.clone(), &[NFT_CONTRACT, "uid"])? else {
        return Err(ServiceError::Conflict(format!(
            "Token {} of {} already registered",
            record.uid, record.nft_contract
        )));
    };

    info!(object_id = %nft.object_id, contract = %nft.nft_contract, token_id = %nft.uid, "nft registered");
    Ok(nft)
}

fn find_token<B: Backend>(backend: &B, contract_address: &str, token_id: &str) -> Result<Option<Stored<Nft>>, ServiceError> {
    let token_id = token_id.trim();
    Ok(backend
        .records()
        .find::<Nft>(NFT_CONTRACT, normalize(contract_address))?
        .into_iter()
        .find(|nft| nft.uid == token_id))
}

pub async fn newest_nfts<B: Backend>(backend: &B) -> Result<Vec<EnrichedNft>, ServiceError> {
    let mut nfts = backend.records().all::<Nft>()?;
    sort_newest_first(&mut nfts);
    nfts.truncate(NEWEST_LIMIT);
    enrich_nfts(backend, nfts, Tolerance::Batch).await
}

pub async fn nfts_from_cause<B: Backend>(backend: &B, contract_address: &str) -> Result<Vec<EnrichedNft>, ServiceError> {
    let mut nfts = backend.records().find::<Nft>(NFT_CONTRACT, normalize(contract_address))?;
    sort_newest_first(&mut nfts);
    enrich_nfts(backend, nfts, Tolerance::Batch).await
}

pub async fn nfts_from_wallet<B: Backend>(backend: &B, wallet: &str) -> Result<Vec<EnrichedNft>, ServiceError> {
    let mut nfts = backend.records().find::<Nft>("owner", normalize(wallet))?;
    sort_newest_first(&mut nfts);
    enrich_nfts(backend, nfts, Tolerance::Batch).await
}

/// A single token. An unknown token is `Ok(None)`.
pub async fn nft_by_address_and_token<B: Backend>(
    backend: &B,
    contract_address: &str,
    token_id: &str,
) -> Result<Option<EnrichedNft>, ServiceError> {
    let Some(nft) = find_token(backend, contract_address, token_id)? else {
        return Ok(None);
    };
    let mut enriched = enrich_nfts(backend, vec![nft], Tolerance::Strict).await?;
    Ok(enriched.pop())
}

/// Moves the off-chain record to its new owner. The transfer itself happened on chain.
pub fn trade_nft<B: Backend>(backend: &B, request: TradeNft) -> Result<Stored<Nft>, ServiceError> {
    let eth_address = normalize(&require(request.eth_address, "ethAddress")?);
    let token_id = require(request.token_id, "tokenId")?;
    let contract_address = require(request.contract_address, "contractAddress")?;

    let Some(mut nft) = find_token(backend, &contract_address, &token_id)? else {
        warn!(contract = %contract_address, token_id = %token_id, "trade of unknown token");
        return Err(ServiceError::NotFound(format!("Token {token_id} of {contract_address} not found")));
    };

    let previous = std::mem::replace(&mut nft.owner, eth_address);
    backend.records().save(&mut nft)?;

    info!(contract = %contract_address, token_id = %token_id, from = %previous, to = %nft.owner, "nft traded");
    Ok(nft)
}

/// Fetches a pinned object: parsed JSON when it is JSON, base64 otherwise.
pub async fn fetch_file<B: Backend>(backend: &B, hash: &str) -> Result<Value, ServiceError> {
    let address = ContentAddress::from_locator(hash)?;
    let bytes = backend.objects().fetch(&address).await?;

    Ok(serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(encode_base64(&bytes))))
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::testing::{backend, IMAGE};

    const CONTRACT: &str = "0xe7f1725e7734ce288f8367e1bb143e90bb3f0512";
    const ALICE: &str = "0x70997970c51812dc3a010c7d01b50e0d17dc79c8";
    const BOB: &str = "0x3c44cdddb6a900fa2b585dd299e03d12fa4293bc";

    fn draft(name: &str) -> NftDraft {
        NftDraft {
            name: Some(name.to_string()),
            description: Some(format!("{name} description")),
            file: Some(IMAGE.to_string()),
        }
    }

    async fn mint_and_register<B: Backend>(backend: &B, contract: &str, uid: &str, owner: &str) -> Stored<Nft> {
        let asset = create_one_nft(backend, draft(&format!("token {uid}"))).await.unwrap();
        register_nft(backend, RegisterNft {
            contract_address: Some(contract.to_string()),
            token_id: Some(uid.to_string()),
            token_uri: Some(format!("ipfs://{}", asset.metadata)),
            owner: Some(owner.to_string()),
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_create_one_nft_pins_metadata() {
        let (_dir, backend) = backend();

        let asset = create_one_nft(&backend, draft("Turtle")).await.unwrap();
        let document = fetch_file(&backend, asset.metadata.as_str()).await.unwrap();

        assert_eq!(document["name"], "Turtle");
        assert_eq!(document["description"], "Turtle description");
        assert_eq!(document["animation_url"], asset.animation_url.as_str());

        let image = fetch_file(&backend, &asset.animation_url).await.unwrap();
        assert_eq!(image, Value::String(IMAGE.to_string()));
    }

    #[tokio::test]
    async fn test_collection_validates_every_draft_first() {
        let (_dir, backend) = backend();
        let mut broken = draft("second");
        broken.file = None;

        match create_collection(&backend, vec![draft("first"), broken]).await {
            Err(ServiceError::Validation(message)) => assert_eq!(message, "Missing parameter: collection[1].file"),
            other => panic!("expected validation error, got {other:?}"),
        }

        let minted = create_collection(&backend, vec![draft("a"), draft("b")]).await.unwrap();
        assert_eq!(minted.len(), 2);
        assert!(create_collection(&backend, Vec::new()).await.is_err());
    }

    #[tokio::test]
    async fn test_newest_keeps_twelve_latest() {
        let (_dir, backend) = backend();
        for uid in 0..15 {
            mint_and_register(&backend, CONTRACT, &uid.to_string(), ALICE).await;
        }

        let newest = newest_nfts(&backend).await.unwrap();
        let uids: Vec<_> = newest.iter().map(|nft| nft.nft.uid.clone()).collect();
        let expected: Vec<_> = (3..15).rev().map(|uid: i32| uid.to_string()).collect();
        assert_eq!(uids, expected);
        assert_eq!(newest[0].title.as_deref(), Some("token 14"));
    }

    #[tokio::test]
    async fn test_views_by_cause_wallet_and_token() {
        let (_dir, backend) = backend();
        mint_and_register(&backend, CONTRACT, "1", ALICE).await;
        mint_and_register(&backend, CONTRACT, "2", BOB).await;
        mint_and_register(&backend, "0x0000000000000000000000000000000000000abc", "1", ALICE).await;

        assert_eq!(nfts_from_cause(&backend, CONTRACT).await.unwrap().len(), 2);

        let alice = nfts_from_wallet(&backend, ALICE).await.unwrap();
        assert_eq!(alice.len(), 2);
        assert!(alice[0].nft.created_at >= alice[1].nft.created_at);

        let token = nft_by_address_and_token(&backend, CONTRACT, "2").await.unwrap().unwrap();
        assert_eq!(token.nft.owner, BOB);
        assert_eq!(token.title.as_deref(), Some("token 2"));
        assert!(!token.status);

        assert!(nft_by_address_and_token(&backend, CONTRACT, "99").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_trade_moves_owner() {
        let (_dir, backend) = backend();
        mint_and_register(&backend, CONTRACT, "7", ALICE).await;

        let traded = trade_nft(&backend, TradeNft {
            eth_address: Some(BOB.to_string()),
            token_id: Some("7".to_string()),
            contract_address: Some(CONTRACT.to_string()),
        })
        .unwrap();
        assert_eq!(traded.owner, BOB);

        let reloaded = nft_by_address_and_token(&backend, CONTRACT, "7").await.unwrap().unwrap();
        assert_eq!(reloaded.nft.owner, BOB);
        assert!(nfts_from_wallet(&backend, ALICE).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_trade_of_unknown_token_mutates_nothing() {
        let (_dir, backend) = backend();
        mint_and_register(&backend, CONTRACT, "7", ALICE).await;

        let missing = trade_nft(&backend, TradeNft {
            eth_address: Some(BOB.to_string()),
            token_id: Some("8".to_string()),
            contract_address: Some(CONTRACT.to_string()),
        });
        assert!(matches!(missing, Err(ServiceError::NotFound(_))));

        let incomplete = trade_nft(&backend, TradeNft {
            eth_address: Some(BOB.to_string()),
            token_id: None,
            contract_address: Some(CONTRACT.to_string()),
        });
        assert!(matches!(incomplete, Err(ServiceError::Validation(_))));

        let untouched = nft_by_address_and_token(&backend, CONTRACT, "7").await.unwrap().unwrap();
        assert_eq!(untouched.nft.owner, ALICE);
    }

    fn registration(contract: &str, token_id: &str) -> RegisterNft {
        RegisterNft {
            contract_address: Some(contract.to_string()),
            token_id: Some(token_id.to_string()),
            token_uri: Some("ipfs://QmMeta".to_string()),
            owner: Some(ALICE.to_string()),
        }
    }

    #[test]
    fn test_register_rejects_duplicate_token() {
        let (_dir, backend) = backend();

        register_nft(&backend, registration(CONTRACT, "1")).unwrap();
        assert!(matches!(register_nft(&backend, registration(CONTRACT, "1")), Err(ServiceError::Conflict(_))));
        // checksummed spelling of the same contract
        let checksummed = registration("0xe7f1725E7734CE288F8367e1Bb143E90bb3F0512", "1");
        assert!(matches!(register_nft(&backend, checksummed), Err(ServiceError::Conflict(_))));
    }

    #[test]
    fn test_register_rejects_malformed_contract_or_token() {
        let (_dir, backend) = backend();

        assert!(matches!(register_nft(&backend, registration("0xc0", "1")), Err(ServiceError::Validation(_))));
        assert!(matches!(register_nft(&backend, registration(CONTRACT, "one")), Err(ServiceError::Validation(_))));
        assert!(backend.records().all::<Nft>().unwrap().is_empty());
    }

    #[test]
    fn test_concurrent_registrations_store_one_token() {
        let (_dir, backend) = backend();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let backend = backend.clone();
                std::thread::spawn(move || register_nft(&backend, registration(CONTRACT, "5")))
            })
            .collect();

        let mut registered = 0;
        for handle in handles {
            match handle.join().unwrap() {
                Ok(_) => registered += 1,
                Err(e) => assert!(matches!(e, ServiceError::Conflict(_)), "unexpected error {e}"),
            }
        }

        assert_eq!(registered, 1);
        assert_eq!(backend.records().find::<Nft>(NFT_CONTRACT, CONTRACT).unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_wallet_and_contract_lookups_ignore_case() {
        let (_dir, backend) = backend();
        mint_and_register(&backend, CONTRACT, "3", ALICE).await;

        let upper_wallet = "0x70997970C51812dc3A010C7d01b50e0d17dc79C8";
        let upper_contract = "0xE7F1725E7734CE288F8367E1BB143E90BB3F0512";
        assert_eq!(nfts_from_wallet(&backend, upper_wallet).await.unwrap().len(), 1);
        assert_eq!(nfts_from_cause(&backend, upper_contract).await.unwrap().len(), 1);
        assert!(nft_by_address_and_token(&backend, upper_contract, "3").await.unwrap().is_some());
    }
}
