use altruist_chain::ChainError;
use altruist_database::DbError;
use altruist_storage::StorageError;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// A required request field is absent. Raised before any I/O.
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error(transparent)]
    Database(#[from] DbError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Chain(#[from] ChainError),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Returns the field if present and not blank.
pub fn require(value: Option<String>, field: &str) -> Result<String, ServiceError> {
    match value {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ServiceError::Validation(format!("Missing parameter: {field}"))),
    }
}

pub fn require_some<T>(value: Option<T>, field: &str) -> Result<T, ServiceError> {
    value.ok_or_else(|| ServiceError::Validation(format!("Missing parameter: {field}")))
}
