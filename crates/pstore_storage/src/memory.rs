//! In-memory entity store for testing.

use crate::entity::{Entity, Query, QueryResults};
use crate::error::{StorageError, StorageResult};
use crate::key::Key;
use crate::store::{EntityStore, TxnHandle};
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap};

/// A mutation buffered by an open transaction.
#[derive(Debug)]
enum Mutation {
    Put(Entity),
    Delete(Vec<Key>),
}

#[derive(Debug, Default)]
struct Inner {
    /// Committed entities by first-insertion sequence.
    entities: BTreeMap<u64, Entity>,
    /// Key -> insertion sequence.
    positions: HashMap<Key, u64>,
    next_position: u64,
    /// Open transactions and their buffered mutations.
    pending: HashMap<TxnHandle, Vec<Mutation>>,
    next_txid: u64,
}

impl Inner {
    fn ensure_active(&self, txn: &TxnHandle) -> StorageResult<()> {
        if self.pending.contains_key(txn) {
            Ok(())
        } else if txn.as_u64() < self.next_txid {
            Err(StorageError::TransactionNotActive { txn: *txn })
        } else {
            Err(StorageError::UnknownTransaction { txn: *txn })
        }
    }

    fn apply(&mut self, mutation: Mutation) {
        match mutation {
            Mutation::Put(entity) => match self.positions.get(entity.key()) {
                Some(position) => {
                    self.entities.insert(*position, entity);
                }
                None => {
                    let position = self.next_position;
                    self.next_position += 1;
                    self.positions.insert(entity.key().clone(), position);
                    self.entities.insert(position, entity);
                }
            },
            Mutation::Delete(keys) => {
                for key in keys {
                    if let Some(position) = self.positions.remove(&key) {
                        self.entities.remove(&position);
                    }
                }
            }
        }
    }
}

/// An in-memory entity store.
///
/// This store keeps all entities in memory and is suitable for:
/// - Unit tests
/// - Integration tests
/// - Ephemeral namespaces that don't need persistence
///
/// Mutations are buffered per transaction and applied atomically on commit.
/// Reads and queries observe committed state only. Queries return entities
/// in the order their keys were first committed.
///
/// # Thread Safety
///
/// This store is thread-safe and can be shared across threads.
///
/// # Example
///
/// ```rust
/// use pstore_storage::{Entity, EntityStore, InMemoryStore, Key};
///
/// let store = InMemoryStore::new();
/// let txn = store.begin_transaction().unwrap();
/// store.put(&txn, Entity::new(Key::from_path(None, "K", "a"), vec![1u8])).unwrap();
/// assert_eq!(store.entity_count(), 0);
/// store.commit(&txn).unwrap();
/// assert_eq!(store.entity_count(), 1);
/// ```
#[derive(Debug, Default)]
pub struct InMemoryStore {
    inner: RwLock<Inner>,
}

impl InMemoryStore {
    /// Creates a new empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of committed entities.
    #[must_use]
    pub fn entity_count(&self) -> usize {
        self.inner.read().entities.len()
    }

    /// Returns the handles of all transactions that are still open.
    ///
    /// Useful for asserting that callers never leak transactions.
    #[must_use]
    pub fn active_transactions(&self) -> Vec<TxnHandle> {
        let mut handles: Vec<_> = self.inner.read().pending.keys().copied().collect();
        handles.sort();
        handles
    }

    /// Returns a copy of all committed entities in store order.
    #[must_use]
    pub fn entities(&self) -> Vec<Entity> {
        self.inner.read().entities.values().cloned().collect()
    }

    /// Removes all committed entities. Open transactions are unaffected.
    pub fn clear(&self) {
        let mut inner = self.inner.write();
        inner.entities.clear();
        inner.positions.clear();
    }
}

impl EntityStore for InMemoryStore {
    fn begin_transaction(&self) -> StorageResult<TxnHandle> {
        let mut inner = self.inner.write();
        let txn = TxnHandle::new(inner.next_txid);
        inner.next_txid += 1;
        inner.pending.insert(txn, Vec::new());
        Ok(txn)
    }

    fn commit(&self, txn: &TxnHandle) -> StorageResult<()> {
        let mut inner = self.inner.write();
        inner.ensure_active(txn)?;
        let mutations = inner.pending.remove(txn).unwrap_or_default();
        for mutation in mutations {
            inner.apply(mutation);
        }
        Ok(())
    }

    fn rollback(&self, txn: &TxnHandle) -> StorageResult<()> {
        let mut inner = self.inner.write();
        inner.ensure_active(txn)?;
        inner.pending.remove(txn);
        Ok(())
    }

    fn is_active(&self, txn: &TxnHandle) -> bool {
        self.inner.read().pending.contains_key(txn)
    }

    fn get(&self, txn: &TxnHandle, key: &Key) -> StorageResult<Entity> {
        let inner = self.inner.read();
        inner.ensure_active(txn)?;
        inner
            .positions
            .get(key)
            .and_then(|position| inner.entities.get(position))
            .cloned()
            .ok_or_else(|| StorageError::entity_not_found(key))
    }

    fn put(&self, txn: &TxnHandle, entity: Entity) -> StorageResult<()> {
        let mut inner = self.inner.write();
        inner.ensure_active(txn)?;
        if let Some(mutations) = inner.pending.get_mut(txn) {
            mutations.push(Mutation::Put(entity));
        }
        Ok(())
    }

    fn delete(&self, txn: &TxnHandle, keys: &[Key]) -> StorageResult<()> {
        let mut inner = self.inner.write();
        inner.ensure_active(txn)?;
        if let Some(mutations) = inner.pending.get_mut(txn) {
            mutations.push(Mutation::Delete(keys.to_vec()));
        }
        Ok(())
    }

    fn query(&self, query: &Query) -> StorageResult<QueryResults> {
        let inner = self.inner.read();
        let entities = inner
            .entities
            .values()
            .filter(|entity| query.matches(entity.key()))
            .map(|entity| {
                if query.is_keys_only() {
                    Entity::key_only(entity.key().clone())
                } else {
                    entity.clone()
                }
            })
            .collect();
        Ok(QueryResults::new(entities))
    }
}
