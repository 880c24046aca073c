use altruist_chain::StaticMarket;
use altruist_database::{InnerDatabase, SafeDatabase};
use altruist_storage::MdbxObjectStore;
use tempfile::{tempdir, TempDir};

use crate::context::Context;

pub type TestBackend = Context<InnerDatabase, MdbxObjectStore<InnerDatabase>, StaticMarket>;

/// base64 of `hello`
pub const IMAGE: &str = "aGVsbG8=";

pub fn backend() -> (TempDir, TestBackend) {
    backend_with(StaticMarket::new())
}

pub fn backend_with(market: StaticMarket) -> (TempDir, TestBackend) {
    let temp_dir = tempdir().unwrap();
    let db = InnerDatabase::new(temp_dir.path()).unwrap();
    let objects = MdbxObjectStore::new(db.clone(), "https://gateway.test");
    (temp_dir, Context::new(db, objects, market))
}
