use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

use crate::StorageError;

/// Multihash prefix of a sha2-256 digest: code 0x12, length 32.
const SHA2_256_PREFIX: [u8; 2] = [0x12, 0x20];

/// Identifier of a stored blob, e.g. `QmNtScDBrnS2TfHTaLMWqMRsgqWaYZYYiRhEkXL571uvkk`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentAddress(String);

impl ContentAddress {
    pub fn parse(raw: &str) -> Result<Self, StorageError> {
        let raw = raw.trim();
        if raw.is_empty() || raw.contains(['/', '?', '#', ' ']) {
            return Err(StorageError::InvalidAddress(raw.to_string()));
        }
        Ok(Self(raw.to_string()))
    }

    /// Extracts the address from a locator whose trailing path segment is the address:
    /// `ipfs://<cid>`, `https://host/ipfs/<cid>` or a bare `<cid>`.
    pub fn from_locator(locator: &str) -> Result<Self, StorageError> {
        let path = locator.split(['?', '#']).next().unwrap_or_default();
        let segment = path
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .unwrap_or_default();

        Self::parse(segment).map_err(|_| StorageError::InvalidAddress(locator.to_string()))
    }

    /// CIDv0 style address of `bytes`: base58 of the sha2-256 multihash.
    pub fn digest(bytes: &[u8]) -> Self {
        let mut multihash = Vec::with_capacity(34);
        multihash.extend_from_slice(&SHA2_256_PREFIX);
        multihash.extend_from_slice(&Sha256::digest(bytes));
        Self(bs58::encode(multihash).into_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContentAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
