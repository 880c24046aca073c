use libmdbx::{Database, DatabaseOptions, Table, TableFlags, Transaction, WriteFlags, WriteMap, RW};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::DbError;

/// Table holding the last key handed out by [`SafeDatabase::append`] for every other table.
const SEQUENCE_TABLE: &str = "__sequence";

#[derive(Clone)]
pub struct InnerDatabase {
    db: Arc<Mutex<Database<WriteMap>>>,
}

pub trait SafeDatabase: Clone + Send + Sync + 'static {

    fn new<P: AsRef<Path>>(path: P) -> Result<Self, DbError> where Self: Sized;

    fn write(&self, key: &str, value: &[u8], table: &str) -> Result<(), DbError>;

    fn read(&self, key: &str, table: &str) -> Result<Option<Vec<u8>>, DbError>;

    /// Every entry of `table` in key order. A table that was never written is empty.
    fn scan(&self, table: &str) -> Result<Vec<(String, Vec<u8>)>, DbError>;

    /// Stores `value` under the next sequential key of `table` and returns that key.
    /// Keys are fixed-width hex so key order is insertion order.
    fn append(&self, value: &[u8], table: &str) -> Result<String, DbError>;

    /// [`append`](SafeDatabase::append) guarded by a scan of `table` in the same write
    /// transaction. Nothing is stored, and `None` returned, when `conflicts` accepts an
    /// existing value.
    fn append_unless<F>(&self, value: &[u8], table: &str, conflicts: F) -> Result<Option<String>, DbError>
    where
        F: Fn(&[u8]) -> Result<bool, DbError>;
}


impl InnerDatabase {
    fn lock(&self) -> Result<MutexGuard<'_, Database<WriteMap>>, DbError> {
        self.db.lock().map_err(|_| DbError::Poisoned)
    }
}

/// Puts `value` under the next key of `table` and advances its sequence. The caller commits.
fn put_next(
    transaction: &Transaction<'_, RW, WriteMap>,
    target: &Table<'_>,
    value: &[u8],
    table: &str,
) -> Result<String, DbError> {
    let sequences = transaction.create_table(Some(SEQUENCE_TABLE), TableFlags::default())?;
    let last = match transaction.get::<Vec<u8>>(&sequences, table.as_bytes())? {
        Some(raw) => {
            let bytes: [u8; 8] = raw
                .as_slice()
                .try_into()
                .map_err(|_| DbError::Corrupted(format!("sequence of table {table}")))?;
            u64::from_be_bytes(bytes)
        }
        None => 0,
    };
    let next = last + 1;
    let key = format!("{next:016x}");

    transaction.put(target, &key, value, WriteFlags::default())?;
    transaction.put(&sequences, table, next.to_be_bytes(), WriteFlags::default())?;
    Ok(key)
}

impl SafeDatabase for InnerDatabase {

    fn new<P: AsRef<Path>>(path: P) -> Result<Self, DbError> {
        let mut options = DatabaseOptions::default();
        options.max_tables = Some(100);
        let db = Database::<WriteMap>::open_with_options(path, options)?;

        Ok(Self {
            db: Arc::new(Mutex::new(db)),
        })
    }


    fn write(&self, key: &str, value: &[u8], table: &str) -> Result<(), DbError> {
        let db = self.lock()?;
        let transaction = db.begin_rw_txn()?;
        let table = transaction.create_table(Some(table), TableFlags::default())?;

        transaction.put(&table, key, value, WriteFlags::default())?;
        transaction.commit()?;
        Ok(())
    }


    fn read(&self, key: &str, table: &str) -> Result<Option<Vec<u8>>, DbError> {
        let db = self.lock()?;
        let transaction = db.begin_ro_txn()?;

        if let Ok(table) = transaction.open_table(Some(table)) {
            let result = transaction.get::<Vec<u8>>(&table, key.as_bytes())?;
            return Ok(result);
        }

        Ok(None)
    }

    fn scan(&self, table: &str) -> Result<Vec<(String, Vec<u8>)>, DbError> {
        let mut entries = Vec::new();
        let db = self.lock()?;
        let transaction = db.begin_ro_txn()?;

        if let Ok(table) = transaction.open_table(Some(table)) {
            let mut cursor = transaction.cursor(&table)?;

            for item in cursor.iter_start::<Vec<u8>, Vec<u8>>() {
                let (key, value) = item?;
                // keys are always written from &str
                let key = String::from_utf8(key).map_err(|e| DbError::Corrupted(e.to_string()))?;
                entries.push((key, value));
            }
        }

        Ok(entries)
    }

    fn append(&self, value: &[u8], table: &str) -> Result<String, DbError> {
        let db = self.lock()?;
        let transaction = db.begin_rw_txn()?;
        let target = transaction.create_table(Some(table), TableFlags::default())?;

        let key = put_next(&transaction, &target, value, table)?;
        transaction.commit()?;
        Ok(key)
    }

    fn append_unless<F>(&self, value: &[u8], table: &str, conflicts: F) -> Result<Option<String>, DbError>
    where
        F: Fn(&[u8]) -> Result<bool, DbError>,
    {
        let db = self.lock()?;
        let transaction = db.begin_rw_txn()?;
        let target = transaction.create_table(Some(table), TableFlags::default())?;

        {
            let mut cursor = transaction.cursor(&target)?;
            for item in cursor.iter_start::<Vec<u8>, Vec<u8>>() {
                let (_, existing) = item?;
                if conflicts(&existing)? {
                    return Ok(None);
                }
            }
        }

        let key = put_next(&transaction, &target, value, table)?;
        transaction.commit()?;
        Ok(Some(key))
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_write_then_read() -> Result<(), Box<dyn std::error::Error>> {
        let temp_dir = tempdir()?;
        let db = InnerDatabase::new(temp_dir.path())?;

        db.write("0xabc", b"{\"name\":\"a\"}", "Foundation")?;

        assert_eq!(db.read("0xabc", "Foundation")?, Some(b"{\"name\":\"a\"}".to_vec()));
        assert_eq!(db.read("0xdef", "Foundation")?, None);
        // never created
        assert_eq!(db.read("0xabc", "Causes")?, None);
        Ok(())
    }

    #[test]
    fn test_append_keeps_insertion_order() -> Result<(), Box<dyn std::error::Error>> {
        let temp_dir = tempdir()?;
        let db = InnerDatabase::new(temp_dir.path())?;

        let mut keys = Vec::new();
        for i in 0..20 {
            keys.push(db.append(format!("value-{i}").as_bytes(), "Post")?);
        }
        let other = db.append(b"other", "Step")?;

        let entries = db.scan("Post")?;
        assert_eq!(entries.len(), 20);
        for (i, (key, value)) in entries.iter().enumerate() {
            assert_eq!(key, &keys[i]);
            assert_eq!(value, format!("value-{i}").as_bytes());
        }

        // sequences are per table
        assert_eq!(other, format!("{:016x}", 1));
        Ok(())
    }

    #[test]
    fn test_append_unless_skips_conflicting_value() -> Result<(), Box<dyn std::error::Error>> {
        let temp_dir = tempdir()?;
        let db = InnerDatabase::new(temp_dir.path())?;

        assert!(db.append_unless(b"a", "Nfts", |existing| Ok(existing == b"a"))?.is_some());
        assert!(db.append_unless(b"a", "Nfts", |existing| Ok(existing == b"a"))?.is_none());
        assert!(db.append_unless(b"b", "Nfts", |existing| Ok(existing == b"b"))?.is_some());

        assert_eq!(db.scan("Nfts")?.len(), 2);
        // a refused append does not consume a key
        assert_eq!(db.append(b"c", "Nfts")?, format!("{:016x}", 3));
        Ok(())
    }

    #[test]
    fn test_scan_missing_table_is_empty() -> Result<(), Box<dyn std::error::Error>> {
        let temp_dir = tempdir()?;
        let db = InnerDatabase::new(temp_dir.path())?;

        assert!(db.scan("CauseDao")?.is_empty());
        Ok(())
    }
}
