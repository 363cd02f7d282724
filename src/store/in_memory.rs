//! InMemoryRecordStore - ordered, JSON-backed record store for testing and development.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use super::{RecordStore, StoreError};
use crate::record::Lookupable;

/// In-memory record store.
///
/// Rows are grouped by collection and kept in insertion order. Clone-friendly via Arc.
#[derive(Clone, Default)]
pub struct InMemoryRecordStore {
    storage: Arc<RwLock<HashMap<&'static str, Vec<Vec<u8>>>>>,
}

impl InMemoryRecordStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record to its collection.
    pub fn insert<M: Lookupable>(&self, record: &M) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec(record).map_err(|e| StoreError::Serde(e.to_string()))?;

        let mut storage = self
            .storage
            .write()
            .map_err(|_| StoreError::Storage("lock poisoned".into()))?;
        storage.entry(M::COLLECTION).or_default().push(bytes);

        Ok(())
    }

    /// Append several records, keeping their order.
    pub fn insert_all<'a, M, I>(&self, records: I) -> Result<(), StoreError>
    where
        M: Lookupable,
        I: IntoIterator<Item = &'a M>,
    {
        let rows = records
            .into_iter()
            .map(|record| serde_json::to_vec(record).map_err(|e| StoreError::Serde(e.to_string())))
            .collect::<Result<Vec<_>, _>>()?;

        let mut storage = self
            .storage
            .write()
            .map_err(|_| StoreError::Storage("lock poisoned".into()))?;
        storage.entry(M::COLLECTION).or_default().extend(rows);

        Ok(())
    }

    /// Number of stored rows of `M`, trashed ones included.
    pub fn count<M: Lookupable>(&self) -> Result<usize, StoreError> {
        let storage = self
            .storage
            .read()
            .map_err(|_| StoreError::Storage("lock poisoned".into()))?;

        Ok(storage.get(M::COLLECTION).map_or(0, Vec::len))
    }
}

impl RecordStore for InMemoryRecordStore {
    fn fetch_all<M: Lookupable>(&self, with_trashed: bool) -> Result<Vec<M>, StoreError> {
        let storage = self
            .storage
            .read()
            .map_err(|_| StoreError::Storage("lock poisoned".into()))?;

        let Some(rows) = storage.get(M::COLLECTION) else {
            return Ok(Vec::new());
        };

        let mut records = Vec::with_capacity(rows.len());
        for bytes in rows {
            let record: M =
                serde_json::from_slice(bytes).map_err(|e| StoreError::Serde(e.to_string()))?;
            if !with_trashed && M::SOFT_DELETES && record.trashed() {
                continue;
            }
            records.push(record);
        }

        Ok(records)
    }
}
