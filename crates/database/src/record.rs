//! Typed documents on top of [`SafeDatabase`].
//!
//! Every record kind declares the table it lives in through [`Schema`]. Rows are stored as
//! JSON under the sequential key handed out by [`SafeDatabase::append`], which doubles as
//! the public `objectId`.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::ops::{Deref, DerefMut};
use tracing::debug;

use crate::basic_db::SafeDatabase;
use crate::DbError;

/// A record kind with a fixed home table.
pub trait Schema: Serialize + DeserializeOwned + Clone + Send + Sync {
    const TABLE: &'static str;
}

/// A record as read back from the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stored<T> {
    pub object_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(flatten)]
    pub record: T,
}

impl<T> Deref for Stored<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.record
    }
}

impl<T> DerefMut for Stored<T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.record
    }
}

// On-disk layout: the record fields plus timestamps. The key is the object id.
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Row<T> {
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    #[serde(flatten)]
    record: T,
}

impl<T> Row<T> {
    fn fresh(record: T) -> Self {
        let now = Utc::now();
        Self { created_at: now, updated_at: now, record }
    }

    fn into_stored(self, object_id: String) -> Stored<T> {
        Stored {
            object_id,
            created_at: self.created_at,
            updated_at: self.updated_at,
            record: self.record,
        }
    }
}

#[derive(Clone)]
pub struct RecordStore<D> {
    db: D,
}

impl<D: SafeDatabase> RecordStore<D> {
    pub fn new(db: D) -> Self {
        Self { db }
    }

    /// Writes a brand-new record and returns it with its assigned id.
    pub fn insert<T: Schema>(&self, record: T) -> Result<Stored<T>, DbError> {
        let row = Row::fresh(record);
        let object_id = self.db.append(&serde_json::to_vec(&row)?, T::TABLE)?;

        debug!(table = T::TABLE, object_id = %object_id, "record inserted");
        Ok(row.into_stored(object_id))
    }

    /// Writes `record` unless a stored record already holds the same values in every field
    /// of `unique`. The check and the write happen in one write transaction, so concurrent
    /// callers cannot both succeed. A duplicate is `Ok(None)`.
    pub fn insert_unique<T: Schema>(&self, record: T, unique: &[&str]) -> Result<Option<Stored<T>>, DbError> {
        let row = Row::fresh(record);
        let candidate = serde_json::to_value(&row)?;
        let keys: Vec<(&str, &Value)> = unique
            .iter()
            .map(|field| (*field, candidate.get(*field).unwrap_or(&Value::Null)))
            .collect();

        let same_keys = |existing: &[u8]| -> Result<bool, DbError> {
            let existing: Value = serde_json::from_slice(existing)?;
            Ok(keys
                .iter()
                .all(|(field, value)| existing.get(*field).unwrap_or(&Value::Null) == *value))
        };

        let Some(object_id) = self.db.append_unless(&serde_json::to_vec(&row)?, T::TABLE, same_keys)? else {
            debug!(table = T::TABLE, ?unique, "duplicate record refused");
            return Ok(None);
        };

        debug!(table = T::TABLE, object_id = %object_id, "record inserted");
        Ok(Some(row.into_stored(object_id)))
    }

    /// Overwrites an existing record in place, bumping `updatedAt`.
    pub fn save<T: Schema>(&self, stored: &mut Stored<T>) -> Result<(), DbError> {
        stored.updated_at = Utc::now();
        let row = Row {
            created_at: stored.created_at,
            updated_at: stored.updated_at,
            record: &stored.record,
        };
        let bytes = serde_json::to_vec(&row)?;
        self.db.write(&stored.object_id, &bytes, T::TABLE)
    }

    pub fn get<T: Schema>(&self, object_id: &str) -> Result<Option<Stored<T>>, DbError> {
        self.db
            .read(object_id, T::TABLE)?
            .map(|bytes| decode(object_id.to_string(), &bytes))
            .transpose()
    }

    /// Every record of the table, oldest first.
    pub fn all<T: Schema>(&self) -> Result<Vec<Stored<T>>, DbError> {
        self.db
            .scan(T::TABLE)?
            .into_iter()
            .map(|(key, bytes)| decode(key, &bytes))
            .collect()
    }

    /// Records whose `field` equals `value`, oldest first.
    pub fn find<T: Schema>(&self, field: &str, value: impl Into<Value>) -> Result<Vec<Stored<T>>, DbError> {
        let expected = value.into();
        let mut matches = Vec::new();

        for (key, bytes) in self.db.scan(T::TABLE)? {
            let row: Value = serde_json::from_slice(&bytes)?;
            if row.get(field) == Some(&expected) {
                matches.push(from_value(key, row)?);
            }
        }

        Ok(matches)
    }

    /// The first record whose `field` equals `value`. Absence is `Ok(None)`, never an error.
    pub fn first<T: Schema>(&self, field: &str, value: impl Into<Value>) -> Result<Option<Stored<T>>, DbError> {
        let expected = value.into();

        for (key, bytes) in self.db.scan(T::TABLE)? {
            let row: Value = serde_json::from_slice(&bytes)?;
            if row.get(field) == Some(&expected) {
                return from_value(key, row).map(Some);
            }
        }

        Ok(None)
    }

    /// Left outer join: pairs every local record with the foreign records whose
    /// `foreign_field` equals the local record's `local_field`.
    pub fn lookup<L: Schema, F: Schema>(
        &self,
        locals: Vec<Stored<L>>,
        local_field: &str,
        foreign_field: &str,
    ) -> Result<Vec<(Stored<L>, Vec<Stored<F>>)>, DbError> {
        let foreign = self.all::<F>()?;
        let foreign_keys = foreign
            .iter()
            .map(|stored| Ok(serde_json::to_value(&stored.record)?.get(foreign_field).cloned()))
            .collect::<Result<Vec<_>, DbError>>()?;

        let mut joined = Vec::with_capacity(locals.len());
        for local in locals {
            let key = serde_json::to_value(&local.record)?.get(local_field).cloned();
            let matched = match key {
                Some(key) if !key.is_null() => foreign
                    .iter()
                    .zip(&foreign_keys)
                    .filter(|(_, candidate)| candidate.as_ref() == Some(&key))
                    .map(|(stored, _)| stored.clone())
                    .collect(),
                _ => Vec::new(),
            };
            joined.push((local, matched));
        }

        Ok(joined)
    }
}

fn decode<T: DeserializeOwned>(object_id: String, bytes: &[u8]) -> Result<Stored<T>, DbError> {
    let row: Row<T> = serde_json::from_slice(bytes)?;
    Ok(row.into_stored(object_id))
}

fn from_value<T: DeserializeOwned>(object_id: String, value: Value) -> Result<Stored<T>, DbError> {
    let row: Row<T> = serde_json::from_value(value)?;
    Ok(row.into_stored(object_id))
}
