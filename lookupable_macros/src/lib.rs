mod lookupable;
mod serde_attrs;

use proc_macro::TokenStream;

// ============================================================================
// #[derive(Lookupable)] derive macro
// ============================================================================

/// Derive macro for the `Lookupable` trait.
///
/// # Usage
///
/// ```ignore
/// #[derive(Clone, Serialize, Deserialize, Lookupable)]
/// #[lookupable(collection = "countries")]
/// struct Country {
///     pub id: u64,
///     #[lookupable(column)]
///     pub code: String,
///     #[lookupable(trashed)]
///     pub deleted_at: Option<String>,
/// }
/// ```
///
/// - `#[lookupable(collection = "...")]` sets the collection name.
///   If omitted, defaults to snake_case struct name + "s".
/// - `#[lookupable(column = "...")]` on the struct, or `#[lookupable(column)]`
///   on a field, names the identifying column. The struct form accepts dotted
///   paths into nested fields. If omitted, lookups read `identifier`.
/// - `#[lookupable(trashed)]` marks a `bool` or `Option<_>` field as the
///   soft-delete state and makes the type soft-deleting.
#[proc_macro_derive(Lookupable, attributes(lookupable))]
pub fn derive_lookupable(input: TokenStream) -> TokenStream {
    lookupable::derive_lookupable(input)
}
