//! Record types - the contract a storage-backed type fulfils to be looked up.
//!
//! ## Example
//!
//! ```ignore
//! use lookupable::Lookupable;
//!
//! #[derive(Clone, Serialize, Deserialize, Lookupable)]
//! #[lookupable(collection = "countries")]
//! struct Country {
//!     pub id: u64,
//!     #[lookupable(column)]
//!     pub code: String,
//!     #[lookupable(trashed)]
//!     pub deleted_at: Option<String>,
//! }
//! ```

mod field;

use serde::{de::DeserializeOwned, Serialize};

pub use field::{field_value, is_member, loosely_equals};

/// Column read when a type declares nothing else.
pub const DEFAULT_LOOKUP_COLUMN: &str = "identifier";

/// Trait for storage-backed types that can be resolved by an identifying value.
///
/// The optional capabilities (a custom identifying column, soft deletion) are
/// associated items with defaults: a type that does not override them gets
/// the default column and is never considered trashed.
pub trait Lookupable: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// The collection this type is stored in (a table in SQL, a key prefix in KV stores).
    const COLLECTION: &'static str;

    /// Name of the field holding the identifying value. Dotted paths reach
    /// into nested objects.
    const LOOKUP_COLUMN: Option<&'static str> = None;

    /// Whether this type supports soft deletion.
    const SOFT_DELETES: bool = false;

    /// Whether this record is logically deleted.
    fn trashed(&self) -> bool {
        false
    }
}

/// Field types that can carry soft-delete state.
///
/// `bool` is a plain flag, `Option<T>` is a `deleted_at` style timestamp that
/// marks the record trashed when present.
pub trait TrashedMarker {
    fn is_trashed(&self) -> bool;
}

impl TrashedMarker for bool {
    fn is_trashed(&self) -> bool {
        *self
    }
}

impl<T> TrashedMarker for Option<T> {
    fn is_trashed(&self) -> bool {
        self.is_some()
    }
}

/// Short, human-readable name of a record type (`Widget` rather than `my_app::models::Widget`).
pub fn record_type_name<M: Lookupable>() -> &'static str {
    short_type_name(std::any::type_name::<M>())
}

fn short_type_name(full: &'static str) -> &'static str {
    // Generic arguments may contain `::` themselves, only split the outer path.
    let outer = full.split('<').next().unwrap_or(full);
    match outer.rfind("::") {
        Some(pos) => &full[pos + 2..],
        None => full,
    }
}
