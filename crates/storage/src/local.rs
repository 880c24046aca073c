use altruist_database::SafeDatabase;
use tracing::debug;

use crate::{ContentAddress, ObjectStorage, StorageError};

const OBJECT_TABLE: &str = "__objects";

/// Object storage kept in the service's own database. Addresses are computed the same way
/// for identical bytes, so storing a blob twice is a no-op.
#[derive(Clone)]
pub struct MdbxObjectStore<D> {
    db: D,
    gateway_url: String,
}

impl<D: SafeDatabase> MdbxObjectStore<D> {
    pub fn new(db: D, gateway_url: impl Into<String>) -> Self {
        Self {
            db,
            gateway_url: gateway_url.into().trim_end_matches('/').to_string(),
        }
    }
}

impl<D: SafeDatabase> ObjectStorage for MdbxObjectStore<D> {
    async fn put(&self, name: &str, bytes: Vec<u8>) -> Result<ContentAddress, StorageError> {
        let address = ContentAddress::digest(&bytes);
        self.db.write(address.as_str(), &bytes, OBJECT_TABLE)?;

        debug!(name, address = %address, size = bytes.len(), "object stored locally");
        Ok(address)
    }

    async fn fetch(&self, address: &ContentAddress) -> Result<Vec<u8>, StorageError> {
        self.db
            .read(address.as_str(), OBJECT_TABLE)?
            .ok_or_else(|| StorageError::NotFound(address.to_string()))
    }

    fn url(&self, address: &ContentAddress) -> String {
        format!("{}/ipfs/{}", self.gateway_url, address)
    }
}
