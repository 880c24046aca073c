//! Decorates causes with the addresses of their deployment chain.
//!
//! The chain is resolved in a fixed order, TimeLock -> DAO -> RoleGrant -> Market -> Proposal,
//! each link looked up by the cause's contract address. The first missing link stops the
//! walk: everything after it stays null while earlier links keep their values. A cause whose
//! walk stops before the Proposal link is only shown to its owner.

use altruist_database::{DbError, RecordStore, SafeDatabase, Stored};
use tracing::debug;

use crate::parser::cause::{Cause, CauseLinks, Dao, EnrichedCause, Market, Proposal, RoleGrant, TimeLock, NFT_ADDRESS, NFT_CONTRACT};

#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub links: CauseLinks,
    /// TimeLock, DAO, RoleGrant and Market were all found. Proposal is optional.
    pub complete: bool,
}

impl Resolution {
    fn stopped(links: CauseLinks) -> Self {
        Self { links, complete: false }
    }
}

/// Walks the dependent tables for one contract address.
pub fn resolve_links<D: SafeDatabase>(
    records: &RecordStore<D>,
    contract_address: Option<&str>,
) -> Result<Resolution, DbError> {
    let mut links = CauseLinks::default();

    let Some(contract) = contract_address.filter(|address| !address.is_empty()) else {
        return Ok(Resolution::stopped(links));
    };

    let Some(timelock) = records.first::<TimeLock>(NFT_CONTRACT, contract)? else {
        return Ok(Resolution::stopped(links));
    };
    links.timelock_address = Some(timelock.record.timelock_address);

    let Some(dao) = records.first::<Dao>(NFT_CONTRACT, contract)? else {
        return Ok(Resolution::stopped(links));
    };
    links.dao_address = Some(dao.record.dao_address);

    if records.first::<RoleGrant>(NFT_CONTRACT, contract)?.is_none() {
        return Ok(Resolution::stopped(links));
    }
    links.role_granted = Some(true);

    let Some(market) = records.first::<Market>(NFT_CONTRACT, contract)? else {
        return Ok(Resolution::stopped(links));
    };
    links.market_address = Some(market.record.marketplace_address);

    links.proposal_id = records
        .first::<Proposal>(NFT_ADDRESS, contract)?
        .map(|proposal| proposal.record.proposal_id);

    Ok(Resolution { links, complete: true })
}

/// Addresses compare case-insensitively; checksummed and lowercase forms are the same wallet.
pub fn is_owner_viewing(wallet: &str, viewer: Option<&str>) -> bool {
    viewer.is_some_and(|viewer| viewer.eq_ignore_ascii_case(wallet))
}

/// Enriches `causes` in order, dropping incomplete ones unless the owner is viewing.
pub fn enrich_causes<D: SafeDatabase>(
    records: &RecordStore<D>,
    causes: Vec<Stored<Cause>>,
    owner_viewing: bool,
) -> Result<Vec<EnrichedCause>, DbError> {
    let mut enriched = Vec::with_capacity(causes.len());

    for cause in causes {
        let resolution = resolve_links(records, cause.contract_address.as_deref())?;

        if !resolution.complete && !owner_viewing {
            debug!(object_id = %cause.object_id, "cause hidden from non-owner, deployment incomplete");
            continue;
        }

        enriched.push(EnrichedCause { cause, links: resolution.links });
    }

    Ok(enriched)
}
