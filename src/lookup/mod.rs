//! Lookups - resolve identifying values to records through a per-type instance cache.
//!
//! The first lookup of a type fetches every record of that type once and keeps
//! the snapshot for the lifetime of the [`LookupContext`]. Later lookups scan
//! the snapshot in storage order.
//!
//! ## Example
//!
//! ```ignore
//! use lookupable::{InMemoryRecordStore, LookupContext, LookupsExt};
//!
//! let ctx = LookupContext::new(InMemoryRecordStore::new());
//! let widget = ctx.lookups::<Widget>().lookup("blue-widget")?;
//! let widgets = ctx.lookups::<Widget>().lookup_many(["a", "b"])?;
//! ```

mod config;
mod identifiers;
mod instances;
mod repository;

use std::any::{Any, TypeId};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};

use serde_json::Value;

use crate::error::{LookupError, LookupResult};
use crate::record::{is_member, loosely_equals, record_type_name, Lookupable};
use crate::store::RecordStore;

use instances::InstanceCache;

pub use config::LookupConfig;
pub use identifiers::IntoIdentifiers;
pub use instances::Instances;
pub use repository::{Lookups, LookupsExt};

type CacheEntry = Arc<dyn Any + Send + Sync>;

/// Owns the record store and the per-type instance caches.
///
/// Create one per process (or per test) and share it by reference or `Arc`.
/// Dropping the context or calling [`clear`](Self::clear) discards every
/// snapshot.
pub struct LookupContext<S> {
    store: S,
    config: LookupConfig,
    caches: RwLock<HashMap<TypeId, CacheEntry>>,
}

impl<S: RecordStore> LookupContext<S> {
    pub fn new(store: S) -> Self {
        Self::with_config(store, LookupConfig::default())
    }

    pub fn with_config(store: S, config: LookupConfig) -> Self {
        Self {
            store,
            config,
            caches: RwLock::new(HashMap::new()),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &LookupConfig {
        &self.config
    }

    /// Discard every cached snapshot. The next lookup of each type fetches again.
    pub fn clear(&self) -> LookupResult<()> {
        let mut caches = self
            .caches
            .write()
            .map_err(|_| LookupError::LockPoisoned("clear"))?;
        caches.clear();
        Ok(())
    }

    /// Whether the snapshot of `M` has been loaded.
    pub fn is_cached<M: Lookupable>(&self) -> LookupResult<bool> {
        let caches = self
            .caches
            .read()
            .map_err(|_| LookupError::LockPoisoned("read"))?;

        match caches.get(&TypeId::of::<M>()) {
            Some(entry) => Ok(entry
                .downcast_ref::<InstanceCache<M>>()
                .is_some_and(InstanceCache::is_loaded)),
            None => Ok(false),
        }
    }

    /// The column identifying values of `M` are read from.
    pub fn identifying_column<M: Lookupable>(&self) -> LookupResult<&str> {
        if M::COLLECTION.trim().is_empty() {
            return Err(LookupError::Configuration(format!(
                "Lookupable requires a storage-backed record type ({} names no collection)",
                record_type_name::<M>()
            )));
        }
        Ok(self.config.column_for::<M>())
    }

    /// Every record of `M`, fetched from the store on first use.
    pub fn instances<M: Lookupable>(&self) -> LookupResult<Arc<Instances<M>>> {
        let column = self.identifying_column::<M>()?;
        self.cache_for::<M>()?.get_or_load(&self.store, column)
    }

    /// First record whose identifying value loosely equals `identifier`.
    pub fn lookup<M: Lookupable>(
        &self,
        identifier: &str,
        with_trashed: bool,
    ) -> LookupResult<Option<M>> {
        let instances = self.instances::<M>()?;
        let found = instances
            .visible(with_trashed)
            .find(|entry| loosely_equals(&entry.key, identifier))
            .map(|entry| entry.record.clone());

        if found.is_none() {
            tracing::trace!(collection = M::COLLECTION, identifier, with_trashed, "lookup miss");
        }
        Ok(found)
    }

    /// Like [`lookup`](Self::lookup), failing with `NotFound` when nothing matches.
    pub fn lookup_or_fail<M: Lookupable>(
        &self,
        identifier: &str,
        with_trashed: bool,
    ) -> LookupResult<M> {
        self.lookup::<M>(identifier, with_trashed)?
            .ok_or_else(|| LookupError::NotFound {
                record_type: record_type_name::<M>(),
                identifiers: vec![identifier.to_string()],
            })
    }

    /// Every record whose identifying value is one of `identifiers`, in storage order.
    pub fn lookup_many<M: Lookupable>(
        &self,
        identifiers: impl IntoIdentifiers,
        with_trashed: bool,
    ) -> LookupResult<Vec<M>> {
        let identifiers = identifiers.into_identifiers();
        self.lookup_many_of::<M>(&identifiers, with_trashed)
    }

    /// Like [`lookup_many`](Self::lookup_many), failing with `NotFound` when the
    /// result is empty. A partial match is returned as is.
    pub fn lookup_many_or_fail<M: Lookupable>(
        &self,
        identifiers: impl IntoIdentifiers,
        with_trashed: bool,
    ) -> LookupResult<Vec<M>> {
        let identifiers = identifiers.into_identifiers();
        let found = self.lookup_many_of::<M>(&identifiers, with_trashed)?;
        if found.is_empty() {
            return Err(LookupError::NotFound {
                record_type: record_type_name::<M>(),
                identifiers,
            });
        }
        Ok(found)
    }

    fn lookup_many_of<M: Lookupable>(
        &self,
        identifiers: &[String],
        with_trashed: bool,
    ) -> LookupResult<Vec<M>> {
        let instances = self.instances::<M>()?;
        let wanted: HashSet<String> = identifiers.iter().cloned().collect();

        let matches: Vec<_> = instances
            .visible(with_trashed)
            .filter(|entry| is_member(&entry.key, &wanted))
            .collect();

        let unmatched = unmatched_identifiers(&wanted, matches.iter().map(|entry| &entry.key));
        if !unmatched.is_empty() {
            tracing::trace!(
                collection = M::COLLECTION,
                requested = wanted.len(),
                ?unmatched,
                "lookup_many partial match"
            );
        }

        let found = matches.into_iter().map(|entry| entry.record.clone()).collect();
        Ok(found)
    }

    fn cache_for<M: Lookupable>(&self) -> LookupResult<Arc<InstanceCache<M>>> {
        let key = TypeId::of::<M>();

        let existing = {
            let caches = self
                .caches
                .read()
                .map_err(|_| LookupError::LockPoisoned("read"))?;
            caches.get(&key).cloned()
        };

        let entry = match existing {
            Some(entry) => entry,
            None => {
                let mut caches = self
                    .caches
                    .write()
                    .map_err(|_| LookupError::LockPoisoned("write"))?;
                caches
                    .entry(key)
                    .or_insert_with(|| Arc::new(InstanceCache::<M>::new()) as CacheEntry)
                    .clone()
            }
        };

        entry.downcast::<InstanceCache<M>>().map_err(|_| {
            LookupError::Configuration(format!(
                "instance cache registered under {} holds another type",
                record_type_name::<M>()
            ))
        })
    }
}

/// Requested identifiers no matched key carries.
fn unmatched_identifiers<'a, 'k>(
    wanted: &'a HashSet<String>,
    keys: impl Iterator<Item = &'k Value>,
) -> Vec<&'a str> {
    let matched: HashSet<&str> = keys.filter_map(Value::as_str).collect();
    let mut unmatched: Vec<&str> = wanted
        .iter()
        .map(String::as_str)
        .filter(|id| !matched.contains(id))
        .collect();
    unmatched.sort_unstable();
    unmatched
}
