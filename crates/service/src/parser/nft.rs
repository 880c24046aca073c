use altruist_database::{Schema, Stored};
use serde::{Deserialize, Serialize};

use crate::parser::cause::Cause;
use crate::parser::foundation::Foundation;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Nft {
    pub nft_contract: String,           // contract address of the owning cause
    pub uid: String,                    // token id, decimal
    pub token_uri: String,              // metadata locator, trailing segment is the content address
    pub owner: String,
}

impl Schema for Nft {
    const TABLE: &'static str = "Nft";
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedNft {
    #[serde(flatten)]
    pub nft: Stored<Nft>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub img: Option<String>,
    pub cause: Option<Stored<Cause>>,
    pub foundation: Option<Stored<Foundation>>,
    pub market_address: Option<String>,
    pub status: bool,                   // listed on the marketplace
    pub price: f64,                     // ether, 0 when unlisted
}
