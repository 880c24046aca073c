pub mod cause;
pub mod foundation;
pub mod metadata;
pub mod nft;
pub mod post;
pub mod step;
