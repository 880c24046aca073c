use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use crate::{ContentAddress, ObjectStorage, StorageError};

/// Decodes a base64 payload, accepting the `data:<mime>;base64,` form browsers produce.
pub fn decode_base64(payload: &str) -> Result<Vec<u8>, StorageError> {
    let payload = payload.trim();
    let encoded = match payload.strip_prefix("data:") {
        Some(rest) => rest
            .split_once(";base64,")
            .map(|(_, data)| data)
            .ok_or_else(|| StorageError::InvalidEncoding("data url without base64 payload".to_string()))?,
        None => payload,
    };

    let compact: String = encoded.chars().filter(|c| !c.is_whitespace()).collect();
    STANDARD
        .decode(compact)
        .map_err(|e| StorageError::InvalidEncoding(e.to_string()))
}

pub fn encode_base64(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// Decodes `payload` and stores it under `name`.
pub async fn upload_base64<S: ObjectStorage>(
    storage: &S,
    name: &str,
    payload: &str,
) -> Result<ContentAddress, StorageError> {
    let bytes = decode_base64(payload)?;
    storage.put(name, bytes).await
}
