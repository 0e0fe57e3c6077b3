use std::collections::HashMap;

use bytes::Buf;

use crate::{
    entry::MergeEntry,
    error::{Error, Result},
};

/// Factory identifier for the split-brain merge payload family.
///
/// Both constants are part of the cross-version wire contract between
/// cluster members and must never change without a migration path.
pub const FACTORY_ID: i32 = -44;

/// Type identifier of [`MergeEntry`] within [`FACTORY_ID`].
pub const MERGE_ENTRY_TYPE_ID: i32 = 1;

pub type DecodeFn<T> = fn(&mut dyn Buf) -> Result<T>;

/// Init-time map from a `(factory_id, type_id)` identity pair to the decode
/// routine for that payload, used when the concrete type of an incoming
/// payload is not known statically.
pub struct Registry<T> {
    decoders: HashMap<(i32, i32), DecodeFn<T>>,
}

impl<T> Registry<T> {
    pub fn new() -> Self {
        Self {
            decoders: HashMap::new(),
        }
    }

    /// Last registration for a pair wins.
    pub fn register(&mut self, factory_id: i32, type_id: i32, decode: DecodeFn<T>) {
        tracing::trace!(factory_id, type_id, "registered wire decoder");
        self.decoders.insert((factory_id, type_id), decode);
    }

    pub fn decode(&self, factory_id: i32, type_id: i32, buf: &mut dyn Buf) -> Result<T> {
        let decode = self
            .decoders
            .get(&(factory_id, type_id))
            .ok_or(Error::UnknownType {
                factory_id,
                type_id,
            })?;
        decode(buf)
    }
}

impl<T> Default for Registry<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// A registry with the merge-entry decode routine already registered.
pub fn merge_registry() -> Registry<MergeEntry> {
    let mut registry = Registry::new();
    registry.register(FACTORY_ID, MERGE_ENTRY_TYPE_ID, |buf| {
        MergeEntry::decode(buf)
    });
    registry
}
