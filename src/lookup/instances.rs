//! Instances - the memoized snapshot of every record of one type.

use std::sync::Arc;

use once_cell::sync::OnceCell;
use serde_json::Value;

use crate::error::{LookupError, LookupResult};
use crate::record::{field_value, Lookupable};
use crate::store::RecordStore;

/// One cached record with its identifying value read once at load time.
#[derive(Debug, Clone)]
pub(crate) struct CachedRecord<M> {
    pub(crate) record: M,
    pub(crate) key: Value,
    pub(crate) trashed: bool,
}

/// Every record of `M` as returned by the store, trashed ones included when
/// `M` soft-deletes. Never refreshed once loaded.
#[derive(Debug)]
pub struct Instances<M> {
    column: String,
    entries: Vec<CachedRecord<M>>,
}

impl<M: Lookupable> Instances<M> {
    fn load<S: RecordStore>(store: &S, column: &str) -> LookupResult<Self> {
        let records = store.fetch_all::<M>(M::SOFT_DELETES).map_err(|err| {
            tracing::warn!(collection = M::COLLECTION, error = %err, "instance fetch failed");
            LookupError::from(err)
        })?;

        let mut entries = Vec::with_capacity(records.len());
        for record in records {
            let projected =
                serde_json::to_value(&record).map_err(|e| LookupError::Serde(e.to_string()))?;
            entries.push(CachedRecord {
                key: field_value(&projected, column),
                trashed: M::SOFT_DELETES && record.trashed(),
                record,
            });
        }

        tracing::debug!(
            collection = M::COLLECTION,
            records = entries.len(),
            column,
            "populated instance cache"
        );

        Ok(Self {
            column: column.to_string(),
            entries,
        })
    }

    /// The column the identifying values were read from.
    pub fn column(&self) -> &str {
        &self.column
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Records in storage order.
    pub fn iter(&self) -> impl Iterator<Item = &M> {
        self.entries.iter().map(|entry| &entry.record)
    }

    /// Records in storage order, skipping trashed ones unless `with_trashed`.
    pub(crate) fn visible(&self, with_trashed: bool) -> impl Iterator<Item = &CachedRecord<M>> {
        self.entries
            .iter()
            .filter(move |entry| with_trashed || !entry.trashed)
    }
}

/// Lazily loaded [`Instances`] slot for one record type.
pub(crate) struct InstanceCache<M> {
    cell: OnceCell<Arc<Instances<M>>>,
}

impl<M: Lookupable> InstanceCache<M> {
    pub(crate) fn new() -> Self {
        Self {
            cell: OnceCell::new(),
        }
    }

    /// Return the snapshot, loading it on first use.
    ///
    /// Concurrent first callers block on a single load. A failed load leaves
    /// the slot empty so the next call fetches again.
    pub(crate) fn get_or_load<S: RecordStore>(
        &self,
        store: &S,
        column: &str,
    ) -> LookupResult<Arc<Instances<M>>> {
        self.cell
            .get_or_try_init(|| Instances::load(store, column).map(Arc::new))
            .map(Arc::clone)
    }

    pub(crate) fn is_loaded(&self) -> bool {
        self.cell.get().is_some()
    }
}
