//! Record stores - the storage collaborator the lookup cache reads from.

mod in_memory;

use thiserror::Error;

use crate::record::Lookupable;

/// Error type for record store operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Serialization/deserialization error.
    #[error("record serialization error: {0}")]
    Serde(String),
    /// Storage-level error.
    #[error("record storage error: {0}")]
    Storage(String),
}

/// Read access to every record of a type.
///
/// Implementations return records in a stable order of their choosing (insertion
/// order, primary key order); lookups preserve it.
pub trait RecordStore: Send + Sync {
    /// Fetch all records of `M`. Soft-deleted records are included only when
    /// `with_trashed` is true.
    fn fetch_all<M: Lookupable>(&self, with_trashed: bool) -> Result<Vec<M>, StoreError>;
}

impl<S: RecordStore> RecordStore for std::sync::Arc<S> {
    fn fetch_all<M: Lookupable>(&self, with_trashed: bool) -> Result<Vec<M>, StoreError> {
        (**self).fetch_all(with_trashed)
    }
}

pub use in_memory::InMemoryRecordStore;
