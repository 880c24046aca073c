use alloy::primitives::utils::format_ether;
use alloy::primitives::{Address, U256};
use alloy::sol;
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, RwLock};
use tracing::debug;

use crate::provider::NodeProvider;
use crate::ChainError;

sol! {
    #[sol(rpc)]
    interface IMarketplace {
        function getListing(address nftAddress, uint256 tokenId) external view returns (uint256 price, address seller);
    }
}

/// Marketplace state of one token. An unlisted token has the zero address as seller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Listing {
    pub price: U256,
    pub seller: Address,
}

impl Listing {
    pub fn unlisted() -> Self {
        Self { price: U256::ZERO, seller: Address::ZERO }
    }

    pub fn is_listed(&self) -> bool {
        !self.seller.is_zero()
    }

    /// Price in ether as a JSON-friendly number. Precision beyond f64 is dropped.
    pub fn price_in_ether(&self) -> f64 {
        format_ether(self.price).parse().unwrap_or(f64::MAX)
    }
}

pub trait MarketReader: Clone + Send + Sync + 'static {
    fn get_listing(
        &self,
        marketplace: &Address,
        nft_contract: &Address,
        token_id: U256,
    ) -> impl Future<Output = Result<Listing, ChainError>> + Send;
}

/// Reads listings from a deployed marketplace contract.
#[derive(Clone)]
pub struct MarketplaceContract {
    provider: NodeProvider,
}

impl MarketplaceContract {
    pub fn new(provider: NodeProvider) -> Self {
        Self { provider }
    }
}

impl MarketReader for MarketplaceContract {
    async fn get_listing(
        &self,
        marketplace: &Address,
        nft_contract: &Address,
        token_id: U256,
    ) -> Result<Listing, ChainError> {
        let contract = IMarketplace::new(*marketplace, self.provider.inner().clone());
        let output = contract.getListing(*nft_contract, token_id).call().await?;
        let listing = Listing { price: output.price, seller: output.seller };

        debug!(
            marketplace = %marketplace,
            nft = %nft_contract,
            token_id = %token_id,
            listed = listing.is_listed(),
            "listing read"
        );
        Ok(listing)
    }
}

/// In-process listings for runs without a chain node. Unknown tokens read as unlisted.
#[derive(Clone, Default)]
pub struct StaticMarket {
    listings: Arc<RwLock<HashMap<(Address, Address, U256), Listing>>>,
    offline: bool,
}

impl StaticMarket {
    pub fn new() -> Self {
        Self::default()
    }

    /// A reader whose every call fails, as when the node is down.
    pub fn offline() -> Self {
        Self { offline: true, ..Self::default() }
    }

    pub fn list(&self, marketplace: Address, nft_contract: Address, token_id: U256, listing: Listing) {
        if let Ok(mut listings) = self.listings.write() {
            listings.insert((marketplace, nft_contract, token_id), listing);
        }
    }
}

impl MarketReader for StaticMarket {
    async fn get_listing(
        &self,
        marketplace: &Address,
        nft_contract: &Address,
        token_id: U256,
    ) -> Result<Listing, ChainError> {
        if self.offline {
            return Err(ChainError::Offline);
        }
        let listings = self.listings.read().map_err(|_| ChainError::Offline)?;
        Ok(listings
            .get(&(*marketplace, *nft_contract, token_id))
            .copied()
            .unwrap_or_else(Listing::unlisted))
    }
}


/// The reader chosen at startup: a live node when one is configured, in-process otherwise.
#[derive(Clone)]
pub enum MarketSource {
    Node(MarketplaceContract),
    Static(StaticMarket),
}

impl MarketReader for MarketSource {
    async fn get_listing(
        &self,
        marketplace: &Address,
        nft_contract: &Address,
        token_id: U256,
    ) -> Result<Listing, ChainError> {
        match self {
            MarketSource::Node(contract) => contract.get_listing(marketplace, nft_contract, token_id).await,
            MarketSource::Static(market) => market.get_listing(marketplace, nft_contract, token_id).await,
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::hex;
    use alloy::sol_types::{SolCall, SolValue};
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::{json, Value};

    const SELLER: &str = "0x70997970c51812dc3a010c7d01b50e0d17dc79c8";
    const TWO_ETHER: u128 = 2_000_000_000_000_000_000;

    // Lists every even token id for 2 ether.
    async fn node(Json(request): Json<Value>) -> Json<Value> {
        let id = request["id"].clone();
        let tx = &request["params"][0];
        let calldata = tx["input"].as_str().or_else(|| tx["data"].as_str()).unwrap_or_default();
        let calldata = hex::decode(calldata).unwrap();
        assert_eq!(&calldata[..4], &IMarketplace::getListingCall::SELECTOR);

        let token_id = U256::from_be_slice(&calldata[36..68]);
        let (price, seller) = if token_id % U256::from(2u64) == U256::ZERO {
            (U256::from(TWO_ETHER), SELLER.parse::<Address>().unwrap())
        } else {
            (U256::ZERO, Address::ZERO)
        };

        let output = (price, seller).abi_encode();
        Json(json!({ "jsonrpc": "2.0", "id": id, "result": hex::encode_prefixed(output) }))
    }

    async fn contract() -> MarketplaceContract {
        let app = Router::new().route("/", post(node));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        MarketplaceContract::new(NodeProvider::new(&format!("http://{address}/")).unwrap())
    }

    #[tokio::test]
    async fn test_listed_and_unlisted_tokens() -> Result<(), Box<dyn std::error::Error>> {
        let contract = contract().await;
        let marketplace: Address = "0x5FbDB2315678afecb367f032d93F642f64180aa3".parse()?;
        let nft: Address = "0xe7f1725E7734CE288F8367e1Bb143E90bb3F0512".parse()?;

        let listed = contract.get_listing(&marketplace, &nft, U256::from(4u64)).await?;
        assert!(listed.is_listed());
        assert_eq!(listed.seller, SELLER.parse::<Address>()?);
        assert_eq!(listed.price_in_ether(), 2.0);

        let unlisted = contract.get_listing(&marketplace, &nft, U256::from(7u64)).await?;
        assert_eq!(unlisted, Listing::unlisted());
        Ok(())
    }

    #[tokio::test]
    async fn test_static_market() -> Result<(), Box<dyn std::error::Error>> {
        let market = StaticMarket::new();
        let marketplace: Address = "0x5FbDB2315678afecb367f032d93F642f64180aa3".parse()?;
        let nft: Address = "0xe7f1725E7734CE288F8367e1Bb143E90bb3F0512".parse()?;
        let listing = Listing { price: U256::from(10u64), seller: SELLER.parse()? };

        market.list(marketplace, nft, U256::from(1u64), listing);

        assert_eq!(market.get_listing(&marketplace, &nft, U256::from(1u64)).await?, listing);
        assert_eq!(market.get_listing(&marketplace, &nft, U256::from(2u64)).await?, Listing::unlisted());
        assert!(matches!(
            StaticMarket::offline().get_listing(&marketplace, &nft, U256::from(1u64)).await,
            Err(ChainError::Offline)
        ));

        let source = MarketSource::Static(market);
        assert_eq!(source.get_listing(&marketplace, &nft, U256::from(1u64)).await?, listing);
        Ok(())
    }

    #[test]
    fn test_price_in_ether() {
        let listing = |wei: u128| Listing { price: U256::from(wei), seller: Address::ZERO };
        assert_eq!(listing(250_000_000_000_000_000).price_in_ether(), 0.25);
        assert_eq!(listing(1_500_000_000_000_000_000).price_in_ether(), 1.5);
        assert_eq!(listing(0).price_in_ether(), 0.0);
    }
}
