use thiserror::Error;

use crate::store::StoreError;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    /// No record matched. Raised only by the `*_or_fail` lookups.
    #[error("no {record_type} record found for [{}]", .identifiers.join(", "))]
    NotFound {
        record_type: &'static str,
        identifiers: Vec<String>,
    },
    /// The type cannot be looked up (e.g. it names no storage collection).
    #[error("{0}")]
    Configuration(String),
    /// The instance cache registry lock was poisoned.
    #[error("lookup registry lock poisoned during {0}")]
    LockPoisoned(&'static str),
    /// The underlying fetch failed.
    #[error(transparent)]
    Store(#[from] StoreError),
    /// A record could not be projected to read its identifying column.
    #[error("record projection error: {0}")]
    Serde(String),
}

impl LookupError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, LookupError::NotFound { .. })
    }
}

pub type LookupResult<T> = Result<T, LookupError>;
