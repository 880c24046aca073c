use altruist_database::Schema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub eth_address: String,            // author foundation's wallet
    pub title: String,
    pub description: String,
    pub image: String,
    #[serde(rename = "name_foundation")]
    pub name_foundation: Option<String>,
}

impl Schema for Post {
    const TABLE: &'static str = "Post";
}
