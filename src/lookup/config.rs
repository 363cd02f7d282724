//! LookupConfig - runtime configuration for identifying-column resolution.

use std::any::TypeId;
use std::collections::HashMap;

use crate::record::{Lookupable, DEFAULT_LOOKUP_COLUMN};

/// Configuration shared by every lookup made through a [`LookupContext`](super::LookupContext).
#[derive(Debug, Clone)]
pub struct LookupConfig {
    default_column: String,
    columns: HashMap<TypeId, String>,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            default_column: DEFAULT_LOOKUP_COLUMN.to_string(),
            columns: HashMap::new(),
        }
    }
}

impl LookupConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the column used by types that declare none.
    pub fn default_column(mut self, column: impl Into<String>) -> Self {
        self.default_column = column.into();
        self
    }

    /// Override the identifying column of `M`, taking precedence over `M::LOOKUP_COLUMN`.
    pub fn with_column<M: Lookupable>(mut self, column: impl Into<String>) -> Self {
        self.columns.insert(TypeId::of::<M>(), column.into());
        self
    }

    /// Resolve the identifying column of `M`.
    ///
    /// Runtime override first, then the type's declared column, then the
    /// default. Blank names are skipped, so resolution never fails.
    pub fn column_for<M: Lookupable>(&self) -> &str {
        let configured = self
            .columns
            .get(&TypeId::of::<M>())
            .map(String::as_str)
            .filter(|c| !c.trim().is_empty());
        if let Some(column) = configured {
            return column;
        }

        if let Some(column) = M::LOOKUP_COLUMN.filter(|c| !c.trim().is_empty()) {
            return column;
        }

        if self.default_column.trim().is_empty() {
            tracing::debug!(
                collection = M::COLLECTION,
                "blank default lookup column, using {DEFAULT_LOOKUP_COLUMN}"
            );
            return DEFAULT_LOOKUP_COLUMN;
        }
        &self.default_column
    }
}
