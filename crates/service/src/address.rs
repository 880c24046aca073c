//! Addresses are stored lowercase so that checksummed and plain spellings of the same
//! wallet or contract find the same records.

use altruist_chain::{Address, U256};

use crate::error::require;
use crate::ServiceError;

/// Stored form of a wallet or contract address taken from a path or request.
pub fn normalize(raw: &str) -> String {
    raw.trim().to_ascii_lowercase()
}

/// A required field holding a 20-byte hex address, in stored form.
pub fn require_address(value: Option<String>, field: &str) -> Result<String, ServiceError> {
    let raw = require(value, field)?;
    let address: Address = raw
        .trim()
        .parse()
        .map_err(|_| ServiceError::Validation(format!("Invalid address for {field}: {raw}")))?;
    Ok(address.to_string().to_ascii_lowercase())
}

/// A required field holding a decimal token id.
pub fn require_token_id(value: Option<String>, field: &str) -> Result<String, ServiceError> {
    let raw = require(value, field)?;
    let trimmed = raw.trim();
    if !trimmed.bytes().all(|byte| byte.is_ascii_digit()) || U256::from_str_radix(trimmed, 10).is_err() {
        return Err(ServiceError::Validation(format!("Invalid token id for {field}: {raw}")));
    }
    Ok(trimmed.to_string())
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_addresses_are_lowercased() {
        assert_eq!(normalize(" 0xAbC "), "0xabc");
        assert_eq!(
            require_address(Some("0x5FbDB2315678afecb367f032d93F642f64180aa3".into()), "contractAddress").unwrap(),
            "0x5fbdb2315678afecb367f032d93f642f64180aa3"
        );
    }

    #[test]
    fn test_malformed_addresses_are_rejected() {
        for raw in ["0xc0", "not an address", "0x5FbDB2315678afecb367f032d93F642f64180aaZ"] {
            assert!(matches!(require_address(Some(raw.into()), "nftContract"), Err(ServiceError::Validation(_))));
        }
        match require_address(None, "nftContract") {
            Err(ServiceError::Validation(message)) => assert_eq!(message, "Missing parameter: nftContract"),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_token_ids_are_decimal() {
        assert_eq!(require_token_id(Some("42".into()), "tokenId").unwrap(), "42");
        assert!(require_token_id(Some("0x2a".into()), "tokenId").is_err());
        assert!(require_token_id(Some("-1".into()), "tokenId").is_err());
        assert!(require_token_id(Some("1".repeat(90)), "tokenId").is_err());
    }
}
