//! Collection-level record CRUD over a key-value medium
//!
//! A collection is an ordered sequence of records serialized as one JSON
//! blob under its collection key. Every operation reads the full
//! collection, mutates it in memory, and writes the whole thing back, so
//! from the caller's perspective each call is atomic: a failed operation
//! leaves the previously stored sequence untouched. There is exactly one
//! logical caller at a time, so no cross-writer coordination is needed.

use crate::store::error::{StoreError, StoreResult};
use crate::store::medium::KeyValueMedium;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;

/// Any record type the store can hold: serde-serializable and carrying
/// its own unique id within a collection.
pub trait StoredRecord: Serialize + DeserializeOwned + Clone + Send + Sync {
    fn record_id(&self) -> &str;
}

impl StoredRecord for crate::store::types::Loc {
    fn record_id(&self) -> &str {
        &self.id
    }
}

/// CRUD facade over a collection blob in a key-value medium
#[derive(Clone)]
pub struct RecordStore {
    medium: Arc<dyn KeyValueMedium>,
}

impl RecordStore {
    pub fn new(medium: Arc<dyn KeyValueMedium>) -> Self {
        Self { medium }
    }

    /// Load the full collection; an absent key reads as an empty sequence
    pub async fn query<R: StoredRecord>(&self, collection: &str) -> StoreResult<Vec<R>> {
        match self.medium.load(collection).await? {
            Some(blob) => {
                serde_json::from_str(&blob).map_err(|e| StoreError::corrupt(collection, e))
            }
            None => Ok(Vec::new()),
        }
    }

    /// Fetch a single record by id
    pub async fn get<R: StoredRecord>(&self, collection: &str, id: &str) -> StoreResult<R> {
        let records = self.query::<R>(collection).await?;
        records
            .into_iter()
            .find(|r| r.record_id() == id)
            .ok_or_else(|| StoreError::not_found(collection, id))
    }

    /// Append a new record (the caller must have assigned a unique id)
    pub async fn post<R: StoredRecord>(&self, collection: &str, record: R) -> StoreResult<R> {
        let mut records = self.query::<R>(collection).await?;
        records.push(record.clone());
        self.write_back(collection, &records).await?;
        Ok(record)
    }

    /// Replace the record matching `record.record_id()` in place
    pub async fn put<R: StoredRecord>(&self, collection: &str, record: R) -> StoreResult<R> {
        let mut records = self.query::<R>(collection).await?;
        let idx = records
            .iter()
            .position(|r| r.record_id() == record.record_id())
            .ok_or_else(|| StoreError::not_found(collection, record.record_id()))?;
        records[idx] = record.clone();
        self.write_back(collection, &records).await?;
        Ok(record)
    }

    /// Delete a record by id
    pub async fn remove<R: StoredRecord>(&self, collection: &str, id: &str) -> StoreResult<()> {
        let mut records = self.query::<R>(collection).await?;
        let before = records.len();
        records.retain(|r| r.record_id() != id);
        if records.len() == before {
            return Err(StoreError::not_found(collection, id));
        }
        self.write_back(collection, &records).await
    }

    /// Replace the whole collection (used for seeding)
    pub async fn replace_all<R: StoredRecord>(
        &self,
        collection: &str,
        records: &[R],
    ) -> StoreResult<()> {
        self.write_back(collection, records).await
    }

    async fn write_back<R: StoredRecord>(&self, collection: &str, records: &[R]) -> StoreResult<()> {
        let blob = serde_json::to_string(records).map_err(|e| StoreError::corrupt(collection, e))?;
        self.medium.save(collection, &blob).await
    }
}
