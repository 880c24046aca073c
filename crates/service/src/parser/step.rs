use altruist_database::Schema;
use serde::{Deserialize, Serialize};

/// A progress milestone a foundation publishes for one of its causes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Step {
    pub eth_address: String,
    pub contract_address: String,
    pub title: String,
    pub description: String,
}

impl Schema for Step {
    const TABLE: &'static str = "Step";
}
