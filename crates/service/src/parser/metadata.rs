use serde::{Deserialize, Serialize};

/// Token metadata document pinned next to every minted asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NftMetadata {
    pub name: String,
    pub description: String,
    pub animation_url: String,
}
