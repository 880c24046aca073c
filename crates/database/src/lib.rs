pub mod basic_db;
pub mod record;

pub use basic_db::{InnerDatabase, SafeDatabase};
pub use record::{RecordStore, Schema, Stored};

#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("mdbx error: {0}")]
    Mdbx(#[from] libmdbx::Error),
    #[error("database mutex poisoned")]
    Poisoned,
    #[error("corrupted entry: {0}")]
    Corrupted(String),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
