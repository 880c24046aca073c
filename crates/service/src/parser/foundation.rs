use altruist_database::Schema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Foundation {
    pub eth_address: String,            // wallet that registered the foundation, unique
    pub name: String,
    pub email: String,
    pub country: String,
    pub description: String,
    pub image: String,                  // content address of the logo
}

impl Schema for Foundation {
    const TABLE: &'static str = "Foundation";
}
