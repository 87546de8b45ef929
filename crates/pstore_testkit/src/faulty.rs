//! Fault injection for store operations.
//!
//! [`FaultyStore`] wraps an [`InMemoryStore`] and fails chosen operations
//! with [`StorageError::Injected`] until they are healed.

use parking_lot::Mutex;
use pstore_storage::{
    Entity, EntityStore, InMemoryStore, Key, Query, QueryResults, StorageError, StorageResult,
    TxnHandle,
};
use std::collections::{HashMap, HashSet};

/// A store operation that can be made to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FaultPoint {
    /// `begin_transaction`
    Begin,
    /// `commit`, leaving the store transaction open.
    Commit,
    /// `commit`, after the store has already discarded the transaction.
    CommitLost,
    /// `rollback`
    Rollback,
    /// `get`
    Get,
    /// `put`
    Put,
    /// `delete`
    Delete,
    /// `query`
    Query,
}

/// An [`EntityStore`] that fails armed operations.
#[derive(Debug, Default)]
pub struct FaultyStore {
    inner: InMemoryStore,
    armed: Mutex<HashSet<FaultPoint>>,
    hits: Mutex<HashMap<FaultPoint, usize>>,
}

impl FaultyStore {
    /// Creates a store with no faults armed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the wrapped store.
    pub fn inner(&self) -> &InMemoryStore {
        &self.inner
    }

    /// Makes `point` fail until healed.
    pub fn fail(&self, point: FaultPoint) {
        self.armed.lock().insert(point);
    }

    /// Stops `point` from failing.
    pub fn heal(&self, point: FaultPoint) {
        self.armed.lock().remove(&point);
    }

    /// Disarms every fault.
    pub fn heal_all(&self) {
        self.armed.lock().clear();
    }

    /// Number of times `point` has failed.
    pub fn hits(&self, point: FaultPoint) -> usize {
        self.hits.lock().get(&point).copied().unwrap_or(0)
    }

    fn check(&self, point: FaultPoint) -> StorageResult<()> {
        if self.armed.lock().contains(&point) {
            *self.hits.lock().entry(point).or_insert(0) += 1;
            return Err(StorageError::injected(format!("{point:?}")));
        }
        Ok(())
    }
}

impl EntityStore for FaultyStore {
    fn begin_transaction(&self) -> StorageResult<TxnHandle> {
        self.check(FaultPoint::Begin)?;
        self.inner.begin_transaction()
    }

    fn commit(&self, txn: &TxnHandle) -> StorageResult<()> {
        self.check(FaultPoint::Commit)?;
        if let Err(err) = self.check(FaultPoint::CommitLost) {
            self.inner.rollback(txn)?;
            return Err(err);
        }
        self.inner.commit(txn)
    }

    fn rollback(&self, txn: &TxnHandle) -> StorageResult<()> {
        self.check(FaultPoint::Rollback)?;
        self.inner.rollback(txn)
    }

    fn is_active(&self, txn: &TxnHandle) -> bool {
        self.inner.is_active(txn)
    }

    fn get(&self, txn: &TxnHandle, key: &Key) -> StorageResult<Entity> {
        self.check(FaultPoint::Get)?;
        self.inner.get(txn, key)
    }

    fn put(&self, txn: &TxnHandle, entity: Entity) -> StorageResult<()> {
        self.check(FaultPoint::Put)?;
        self.inner.put(txn, entity)
    }

    fn delete(&self, txn: &TxnHandle, keys: &[Key]) -> StorageResult<()> {
        self.check(FaultPoint::Delete)?;
        self.inner.delete(txn, keys)
    }

    fn query(&self, query: &Query) -> StorageResult<QueryResults> {
        self.check(FaultPoint::Query)?;
        self.inner.query(query)
    }
}
