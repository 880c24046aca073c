//! Content-addressed object storage: an IPFS HTTP gateway for production and an
//! mdbx-backed store with the same addressing for local runs and tests.

pub mod address;
pub mod encoding;
pub mod gateway;
pub mod local;

use std::future::Future;

pub use address::ContentAddress;
pub use gateway::IpfsGateway;
pub use local::MdbxObjectStore;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("gateway returned {status}: {body}")]
    Gateway { status: u16, body: String },
    #[error("database error: {0}")]
    Database(#[from] altruist_database::DbError),
    #[error("object {0} not found")]
    NotFound(String),
    #[error("invalid content address: {0}")]
    InvalidAddress(String),
    #[error("invalid encoding: {0}")]
    InvalidEncoding(String),
}

pub trait ObjectStorage: Clone + Send + Sync + 'static {
    /// Stores a named blob and returns its content address.
    fn put(&self, name: &str, bytes: Vec<u8>) -> impl Future<Output = Result<ContentAddress, StorageError>> + Send;

    /// Fetches the blob stored under `address`.
    fn fetch(&self, address: &ContentAddress) -> impl Future<Output = Result<Vec<u8>, StorageError>> + Send;

    /// Public gateway URL of `address`.
    fn url(&self, address: &ContentAddress) -> String;
}
