use altruist_database::Stored;
use altruist_storage::encoding::upload_base64;
use serde::Deserialize;
use tracing::info;

use crate::address::normalize;
use crate::context::Backend;
use crate::error::require;
use crate::parser::foundation::Foundation;
use crate::ServiceError;

pub const ETH_ADDRESS: &str = "ethAddress";

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFoundation {
    #[serde(alias = "wallet")]
    pub eth_address: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub country: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,          // base64 logo
}

/// Registers a foundation once per wallet, pinning its logo first.
pub async fn create_foundation<B: Backend>(
    backend: &B,
    request: CreateFoundation,
) -> Result<Stored<Foundation>, ServiceError> {
    let eth_address = normalize(&require(request.eth_address, ETH_ADDRESS)?);
    let name = require(request.name, "name")?;
    let email = require(request.email, "email")?;
    let country = require(request.country, "country")?;
    let description = require(request.description, "description")?;
    let image = require(request.image, "image")?;

    let records = backend.records();
    let duplicate = || ServiceError::Conflict(format!("Foundation for {eth_address} already exists"));
    // checked before pinning the logo; insert_unique below settles races
    if records.first::<Foundation>(ETH_ADDRESS, eth_address.as_str())?.is_some() {
        return Err(duplicate());
    }

    let image = upload_base64(backend.objects(), &name, &image).await?;

    let foundation = Foundation {
        eth_address: eth_address.clone(),
        name,
        email,
        country,
        description,
        image: image.to_string(),
    };
    let foundation = records.insert_unique(foundation, &[ETH_ADDRESS])?.ok_or_else(duplicate)?;

    info!(object_id = %foundation.object_id, wallet = %foundation.eth_address, "foundation created");
    Ok(foundation)
}

pub fn list_foundations<B: Backend>(backend: &B) -> Result<Vec<Stored<Foundation>>, ServiceError> {
    Ok(backend.records().all::<Foundation>()?)
}

pub fn foundation_by_email<B: Backend>(backend: &B, email: &str) -> Result<Option<Stored<Foundation>>, ServiceError> {
    Ok(backend.records().first::<Foundation>("email", email)?)
}

pub fn foundation_by_wallet<B: Backend>(backend: &B, wallet: &str) -> Result<Option<Stored<Foundation>>, ServiceError> {
    Ok(backend.records().first::<Foundation>(ETH_ADDRESS, normalize(wallet))?)
}
