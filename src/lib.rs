//! Resolve human-facing identifiers (slugs, external codes) to storage-backed
//! records, memoizing the full record set of each type after the first lookup.

mod error;
mod lookup;
mod record;
mod store;

pub use error::{LookupError, LookupResult};
pub use lookup::{
    Instances, IntoIdentifiers, LookupConfig, LookupContext, Lookups, LookupsExt,
};
pub use record::{
    field_value, is_member, loosely_equals, record_type_name, Lookupable, TrashedMarker,
    DEFAULT_LOOKUP_COLUMN,
};
pub use store::{InMemoryRecordStore, RecordStore, StoreError};

// Re-export the derive macro under the trait's name
#[cfg(feature = "derive")]
pub use lookupable_macros::Lookupable;
