use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info};

use crate::{ContentAddress, ObjectStorage, StorageError};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// IPFS node reached through its HTTP API for uploads and a public gateway for reads.
#[derive(Clone)]
pub struct IpfsGateway {
    http: reqwest::Client,
    api_url: String,
    gateway_url: String,
    api_token: Option<String>,
}

// Response of `POST /api/v0/add`.
#[derive(Deserialize)]
struct AddResponse {
    #[serde(rename = "Hash")]
    hash: String,
}

impl IpfsGateway {
    pub fn new(
        api_url: &str,
        gateway_url: &str,
        api_token: Option<String>,
    ) -> Result<Self, StorageError> {
        let http = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .build()?;

        info!(api = api_url, gateway = gateway_url, "IPFS gateway initialized");

        Ok(Self {
            http,
            api_url: api_url.trim_end_matches('/').to_string(),
            gateway_url: gateway_url.trim_end_matches('/').to_string(),
            api_token: api_token.filter(|token| !token.is_empty()),
        })
    }
}

impl ObjectStorage for IpfsGateway {
    async fn put(&self, name: &str, bytes: Vec<u8>) -> Result<ContentAddress, StorageError> {
        let size = bytes.len();
        let form = Form::new().part("file", Part::bytes(bytes).file_name(name.to_string()));

        let mut request = self
            .http
            .post(format!("{}/api/v0/add", self.api_url))
            .query(&[("pin", "true")])
            .multipart(form);
        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StorageError::Gateway { status: status.as_u16(), body });
        }

        let added: AddResponse = response.json().await?;
        let address = ContentAddress::parse(&added.hash)?;

        debug!(name, address = %address, size, "object pinned");
        Ok(address)
    }

    async fn fetch(&self, address: &ContentAddress) -> Result<Vec<u8>, StorageError> {
        let response = self.http.get(self.url(address)).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(StorageError::NotFound(address.to_string()));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StorageError::Gateway { status: status.as_u16(), body });
        }

        Ok(response.bytes().await?.to_vec())
    }

    fn url(&self, address: &ContentAddress) -> String {
        format!("{}/ipfs/{}", self.gateway_url, address)
    }
}
