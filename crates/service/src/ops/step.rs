use altruist_database::Stored;
use serde::Deserialize;
use tracing::info;

use crate::address::normalize;
use crate::context::Backend;
use crate::error::require;
use crate::ops::foundation::ETH_ADDRESS;
use crate::parser::step::Step;
use crate::ServiceError;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateStep {
    pub eth_address: Option<String>,
    pub contract_address: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
}

pub fn create_step<B: Backend>(backend: &B, request: CreateStep) -> Result<Stored<Step>, ServiceError> {
    let step = Step {
        eth_address: normalize(&require(request.eth_address, ETH_ADDRESS)?),
        contract_address: normalize(&require(request.contract_address, "contractAddress")?),
        title: require(request.title, "title")?,
        description: require(request.description, "description")?,
    };

    let step = backend.records().insert(step)?;
    info!(object_id = %step.object_id, contract = %step.contract_address, "step created");
    Ok(step)
}

/// Every step published for a cause contract, oldest first.
pub fn steps_by_contract<B: Backend>(backend: &B, contract_address: &str) -> Result<Vec<Stored<Step>>, ServiceError> {
    Ok(backend.records().find::<Step>("contractAddress", normalize(contract_address))?)
}

/// The first step a foundation wallet published.
pub fn first_step_by_wallet<B: Backend>(backend: &B, wallet: &str) -> Result<Option<Stored<Step>>, ServiceError> {
    Ok(backend.records().first::<Step>(ETH_ADDRESS, normalize(wallet))?)
}
