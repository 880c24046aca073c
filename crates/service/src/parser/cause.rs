use altruist_database::{Schema, Stored};
use serde::{Deserialize, Serialize};

pub const NFT_CONTRACT: &str = "nftContract";
pub const NFT_ADDRESS: &str = "nftAddress";

/// A fundraising campaign. `contract_address` stays empty until its NFT collection is deployed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cause {
    pub contract_address: Option<String>,
    pub nft_artist: String,             // owning foundation's wallet
    pub title: String,
    pub goal: f64,
    pub initial_date: String,
    pub duration: u64,                  // days
    pub image: String,                  // content address
}

impl Schema for Cause {
    const TABLE: &'static str = "Causes";
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeLock {
    pub nft_contract: String,
    pub timelock_address: String,
}

impl Schema for TimeLock {
    const TABLE: &'static str = "CauseTimeLock";
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dao {
    pub nft_contract: String,
    pub dao_address: String,
}

impl Schema for Dao {
    const TABLE: &'static str = "CauseDao";
}

/// The DAO was granted the timelock roles. Only its presence matters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleGrant {
    pub nft_contract: String,
}

impl Schema for RoleGrant {
    const TABLE: &'static str = "CauseTimelockGranted";
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Market {
    pub nft_contract: String,
    pub marketplace_address: String,
}

impl Schema for Market {
    const TABLE: &'static str = "CauseMarket";
}

// Keyed by `nftAddress`, unlike the other dependent tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Proposal {
    pub nft_address: String,
    pub proposal_id: String,
}

impl Schema for Proposal {
    const TABLE: &'static str = "CauseProposal";
}

/// Addresses derived per request from the dependent tables, in lookup order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CauseLinks {
    pub timelock_address: Option<String>,
    pub dao_address: Option<String>,
    pub role_granted: Option<bool>,
    pub market_address: Option<String>,
    pub proposal_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedCause {
    #[serde(flatten)]
    pub cause: Stored<Cause>,
    #[serde(flatten)]
    pub links: CauseLinks,
}
