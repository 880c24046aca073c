pub mod cause;
pub mod nft;
