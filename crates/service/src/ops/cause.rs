use altruist_database::{Schema, Stored};
use altruist_storage::encoding::upload_base64;
use serde::Deserialize;
use tracing::{debug, info};

use crate::address::{normalize, require_address};
use crate::context::Backend;
use crate::enrich::cause::{enrich_causes, is_owner_viewing};
use crate::error::{require, require_some};
use crate::parser::cause::{Cause, Dao, EnrichedCause, Market, Proposal, RoleGrant, TimeLock, NFT_ADDRESS, NFT_CONTRACT};
use crate::ServiceError;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCause {
    pub wallet: Option<String>,
    pub image: Option<String>,          // base64
    pub title: Option<String>,
    pub goal: Option<f64>,
    pub initial_date: Option<String>,
    pub duration: Option<u64>,
    pub contract_address: Option<String>,
}

/// One deployment fact observed on chain for a cause's contract.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum DeploymentEvent {
    TimeLock { nft_contract: String, timelock_address: String },
    Dao { nft_contract: String, dao_address: String },
    RoleGranted { nft_contract: String },
    Market { nft_contract: String, marketplace_address: String },
    Proposal { nft_address: String, proposal_id: String },
}

pub async fn create_cause<B: Backend>(backend: &B, request: CreateCause) -> Result<Stored<Cause>, ServiceError> {
    let wallet = normalize(&require(request.wallet, "wallet")?);
    let image = require(request.image, "image")?;
    let title = require(request.title, "title")?;
    let goal = require_some(request.goal, "goal")?;
    let initial_date = require(request.initial_date, "initialDate")?;
    let duration = require_some(request.duration, "duration")?;
    let contract_address = match request.contract_address.filter(|address| !address.trim().is_empty()) {
        Some(address) => Some(require_address(Some(address), "contractAddress")?),
        None => None,
    };

    // a failed insert leaves the uploaded image pinned
    let image = upload_base64(backend.objects(), &title, &image).await?;

    let cause = backend.records().insert(Cause {
        contract_address,
        nft_artist: wallet,
        title,
        goal,
        initial_date,
        duration,
        image: image.to_string(),
    })?;

    info!(object_id = %cause.object_id, wallet = %cause.nft_artist, "cause created");
    Ok(cause)
}

/// Causes of `wallet`, decorated with their deployment chain. Only the owner sees causes
/// whose deployment is unfinished.
pub fn causes_by_wallet<B: Backend>(
    backend: &B,
    wallet: &str,
    viewer: Option<&str>,
) -> Result<Vec<EnrichedCause>, ServiceError> {
    let wallet = normalize(wallet);
    let records = backend.records();
    let causes = records.find::<Cause>("nftArtist", wallet.as_str())?;
    let owner_viewing = is_owner_viewing(&wallet, viewer);

    debug!(wallet = %wallet, owner_viewing, found = causes.len(), "enriching causes");
    Ok(enrich_causes(records, causes, owner_viewing)?)
}

/// Stores a deployment fact. Each kind exists at most once per contract.
pub fn record_deployment<B: Backend>(backend: &B, event: DeploymentEvent) -> Result<String, ServiceError> {
    match event {
        DeploymentEvent::TimeLock { nft_contract, timelock_address } => insert_once(backend, NFT_CONTRACT, TimeLock {
            nft_contract: address(nft_contract, NFT_CONTRACT)?,
            timelock_address: address(timelock_address, "timelockAddress")?,
        }),
        DeploymentEvent::Dao { nft_contract, dao_address } => insert_once(backend, NFT_CONTRACT, Dao {
            nft_contract: address(nft_contract, NFT_CONTRACT)?,
            dao_address: address(dao_address, "daoAddress")?,
        }),
        DeploymentEvent::RoleGranted { nft_contract } => insert_once(backend, NFT_CONTRACT, RoleGrant {
            nft_contract: address(nft_contract, NFT_CONTRACT)?,
        }),
        DeploymentEvent::Market { nft_contract, marketplace_address } => insert_once(backend, NFT_CONTRACT, Market {
            nft_contract: address(nft_contract, NFT_CONTRACT)?,
            marketplace_address: address(marketplace_address, "marketplaceAddress")?,
        }),
        DeploymentEvent::Proposal { nft_address, proposal_id } => insert_once(backend, NFT_ADDRESS, Proposal {
            nft_address: address(nft_address, NFT_ADDRESS)?,
            proposal_id: require(Some(proposal_id), "proposalId")?,
        }),
    }
}

fn address(raw: String, field: &str) -> Result<String, ServiceError> {
    require_address(Some(raw), field)
}

fn insert_once<B: Backend, T: Schema>(backend: &B, field: &str, record: T) -> Result<String, ServiceError> {
    let Some(stored) = backend.records().insert_unique(record, &[field])? else {
        return Err(ServiceError::Conflict(format!("{} already recorded for this contract", T::TABLE)));
    };

    info!(table = T::TABLE, object_id = %stored.object_id, "deployment recorded");
    Ok(stored.object_id)
}
