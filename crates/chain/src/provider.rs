use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use alloy::transports::http::reqwest::Url;
use tracing::info;

use crate::ChainError;

/// HTTP connection to an Ethereum-compatible node.
#[derive(Clone)]
pub struct NodeProvider {
    inner: DynProvider,
}

impl NodeProvider {
    pub fn new(url: &str) -> Result<Self, ChainError> {
        let parsed: Url = url.parse().map_err(|_| ChainError::InvalidUrl(url.to_string()))?;
        let inner = ProviderBuilder::new().connect_http(parsed).erased();

        info!(rpc = url, "node provider initialized");
        Ok(Self { inner })
    }

    pub async fn chain_id(&self) -> Result<u64, ChainError> {
        Ok(self.inner.get_chain_id().await?)
    }

    pub fn inner(&self) -> &DynProvider {
        &self.inner
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::{json, Value};

    async fn node(Json(request): Json<Value>) -> Json<Value> {
        let id = request["id"].clone();
        let reply = match request["method"].as_str() {
            Some("eth_chainId") => json!({ "jsonrpc": "2.0", "id": id, "result": "0x89" }),
            _ => json!({ "jsonrpc": "2.0", "id": id, "error": { "code": -32601, "message": "method not found" } }),
        };
        Json(reply)
    }

    async fn spawn_node() -> String {
        let app = Router::new().route("/", post(node));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{address}/")
    }

    #[tokio::test]
    async fn test_chain_id() -> Result<(), Box<dyn std::error::Error>> {
        let provider = NodeProvider::new(&spawn_node().await)?;
        assert_eq!(provider.chain_id().await?, 137);
        Ok(())
    }

    #[test]
    fn test_rejects_malformed_url() {
        assert!(matches!(NodeProvider::new("not a url"), Err(ChainError::InvalidUrl(_))));
    }
}
