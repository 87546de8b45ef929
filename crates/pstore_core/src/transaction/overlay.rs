//! Per-transaction record of uncommitted writes.

use crate::codec::KeyBytes;
use std::collections::{HashMap, HashSet};

/// What the overlay knows about a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Lookup<'a> {
    /// Written in this transaction; holds the serialized value.
    Added(&'a [u8]),
    /// Deleted in this transaction.
    Deleted,
    /// Not touched in this transaction.
    Untouched,
}

/// Uncommitted writes of one transaction.
///
/// A key is in at most one of `added` and `deleted`. `added` remembers the
/// order in which keys were first written so that enumeration is stable.
#[derive(Debug, Default)]
pub(crate) struct Overlay {
    added: HashMap<KeyBytes, Vec<u8>>,
    added_order: Vec<KeyBytes>,
    /// Deleted key -> value it had before deletion, if any.
    deleted: HashMap<KeyBytes, Option<Vec<u8>>>,
}

impl Overlay {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn lookup(&self, key: &KeyBytes) -> Lookup<'_> {
        if let Some(value) = self.added.get(key) {
            Lookup::Added(value)
        } else if self.deleted.contains_key(key) {
            Lookup::Deleted
        } else {
            Lookup::Untouched
        }
    }

    /// Records a write. Rewriting a key keeps its position.
    pub(crate) fn record_set(&mut self, key: KeyBytes, value: Vec<u8>) {
        self.deleted.remove(&key);
        if self.added.insert(key.clone(), value).is_none() {
            self.added_order.push(key);
        }
    }

    /// Records a delete along with the value the key had before it.
    pub(crate) fn record_delete(&mut self, key: KeyBytes, previous: Option<Vec<u8>>) {
        if self.added.remove(&key).is_some() {
            self.added_order.retain(|k| k != &key);
        }
        self.deleted.insert(key, previous);
    }

    /// Merges the store's key list with this overlay.
    ///
    /// Computes `(store ∪ added) \ deleted` without duplicates. Store keys
    /// come first in store order, then keys only written here in write order.
    pub(crate) fn merge_keys(&self, store_keys: Vec<KeyBytes>) -> Vec<KeyBytes> {
        let mut seen = HashSet::with_capacity(store_keys.len() + self.added_order.len());
        store_keys
            .into_iter()
            .chain(self.added_order.iter().cloned())
            .filter(|key| !self.deleted.contains_key(key))
            .filter(|key| seen.insert(key.clone()))
            .collect()
    }

    pub(crate) fn added_len(&self) -> usize {
        self.added.len()
    }

    pub(crate) fn deleted_len(&self) -> usize {
        self.deleted.len()
    }

    pub(crate) fn clear(&mut self) {
        self.added.clear();
        self.added_order.clear();
        self.deleted.clear();
    }
}
