//! Read-only access to an EVM chain: a node provider and the marketplace `getListing` call.

pub mod market;
pub mod provider;

pub use alloy::primitives::{Address, U256};
pub use market::{Listing, MarketReader, MarketSource, MarketplaceContract, StaticMarket};
pub use provider::NodeProvider;

#[derive(Debug, thiserror::Error)]
pub enum ChainError {
    #[error("rpc error: {0}")]
    Rpc(#[from] alloy::transports::TransportError),
    #[error("contract call failed: {0}")]
    Contract(#[from] alloy::contract::Error),
    #[error("invalid rpc url: {0}")]
    InvalidUrl(String),
    #[error("invalid address: {0}")]
    InvalidAddress(String),
    #[error("invalid token id: {0}")]
    InvalidTokenId(String),
    #[error("market reader offline")]
    Offline,
}
