//! Lookups - typed accessor for the lookups of one record type.

use std::marker::PhantomData;
use std::sync::Arc;

use super::{IntoIdentifiers, Instances, LookupContext};
use crate::error::LookupResult;
use crate::record::Lookupable;
use crate::store::RecordStore;

/// Typed wrapper for looking up records of a specific type.
///
/// The short methods exclude trashed records; the `*_with_trashed` variants
/// include them.
pub struct Lookups<'a, S, M> {
    context: &'a LookupContext<S>,
    _marker: PhantomData<M>,
}

impl<'a, S: RecordStore, M: Lookupable> Lookups<'a, S, M> {
    pub fn new(context: &'a LookupContext<S>) -> Self {
        Self {
            context,
            _marker: PhantomData,
        }
    }

    /// Find the first record identified by `identifier`.
    pub fn lookup(&self, identifier: &str) -> LookupResult<Option<M>> {
        self.context.lookup(identifier, false)
    }

    pub fn lookup_with_trashed(&self, identifier: &str) -> LookupResult<Option<M>> {
        self.context.lookup(identifier, true)
    }

    /// Find the first record identified by `identifier`, or fail with `NotFound`.
    pub fn lookup_or_fail(&self, identifier: &str) -> LookupResult<M> {
        self.context.lookup_or_fail(identifier, false)
    }

    pub fn lookup_or_fail_with_trashed(&self, identifier: &str) -> LookupResult<M> {
        self.context.lookup_or_fail(identifier, true)
    }

    /// Find every record identified by one of `identifiers`.
    pub fn lookup_many(&self, identifiers: impl IntoIdentifiers) -> LookupResult<Vec<M>> {
        self.context.lookup_many(identifiers, false)
    }

    pub fn lookup_many_with_trashed(
        &self,
        identifiers: impl IntoIdentifiers,
    ) -> LookupResult<Vec<M>> {
        self.context.lookup_many(identifiers, true)
    }

    /// Find every record identified by one of `identifiers`, failing with
    /// `NotFound` only when none is found.
    pub fn lookup_many_or_fail(&self, identifiers: impl IntoIdentifiers) -> LookupResult<Vec<M>> {
        self.context.lookup_many_or_fail(identifiers, false)
    }

    pub fn lookup_many_or_fail_with_trashed(
        &self,
        identifiers: impl IntoIdentifiers,
    ) -> LookupResult<Vec<M>> {
        self.context.lookup_many_or_fail(identifiers, true)
    }

    /// The cached snapshot of every record of this type.
    pub fn instances(&self) -> LookupResult<Arc<Instances<M>>> {
        self.context.instances()
    }

    pub fn identifying_column(&self) -> LookupResult<&'a str> {
        self.context.identifying_column::<M>()
    }
}

/// Extension trait for typed lookups on a [`LookupContext`].
pub trait LookupsExt<S> {
    /// Get a typed lookup accessor.
    fn lookups<M: Lookupable>(&self) -> Lookups<'_, S, M>;
}

impl<S: RecordStore> LookupsExt<S> for LookupContext<S> {
    fn lookups<M: Lookupable>(&self) -> Lookups<'_, S, M> {
        Lookups::new(self)
    }
}
