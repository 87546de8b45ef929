//! Entity store trait definition.

use crate::entity::{Entity, Query, QueryResults};
use crate::error::StorageResult;
use crate::key::Key;
use std::fmt;

/// Handle to a transaction opened by an [`EntityStore`].
///
/// Handles are issued by [`EntityStore::begin_transaction`] and are only
/// meaningful to the store that issued them. IDs are never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TxnHandle(u64);

impl TxnHandle {
    /// Creates a handle from a raw transaction ID.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw ID value.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TxnHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "txn:{}", self.0)
    }
}

/// A remote or local keyed-entity store.
///
/// Stores are **opaque entity stores**: every entity is one key and one
/// serialized value slot. PStore owns all serialization.
///
/// # Invariants
///
/// - Mutations made under a transaction become visible to other readers
///   only after `commit`, and never after `rollback`
/// - `commit` and `rollback` end the transaction; `is_active` is false afterwards
/// - `get` reports a missing entity as [`crate::StorageError::EntityNotFound`]
/// - `query` returns matches in a stable store order
/// - Stores must be `Send + Sync` for shared access
///
/// # Implementors
///
/// - [`super::InMemoryStore`] - For testing
pub trait EntityStore: Send + Sync {
    /// Begins a new transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot start a transaction.
    fn begin_transaction(&self) -> StorageResult<TxnHandle>;

    /// Atomically applies every mutation made under `txn`.
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction is not active or the commit fails.
    /// A failed commit applies nothing.
    fn commit(&self, txn: &TxnHandle) -> StorageResult<()>;

    /// Discards every mutation made under `txn`.
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction is not active.
    fn rollback(&self, txn: &TxnHandle) -> StorageResult<()>;

    /// Returns true while `txn` has been neither committed nor rolled back.
    fn is_active(&self, txn: &TxnHandle) -> bool;

    /// Fetches the entity stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::StorageError::EntityNotFound`] if nothing is stored
    /// under `key`, or another error if the lookup fails.
    fn get(&self, txn: &TxnHandle, key: &Key) -> StorageResult<Entity>;

    /// Stores `entity` under `txn`, replacing any entity with the same key.
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction is not active or the write fails.
    fn put(&self, txn: &TxnHandle, entity: Entity) -> StorageResult<()>;

    /// Deletes the entities stored under `keys`. Missing keys are ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction is not active or the delete fails.
    fn delete(&self, txn: &TxnHandle, keys: &[Key]) -> StorageResult<()>;

    /// Runs `query` against committed state.
    ///
    /// Keys-only queries return [`Entity::key_only`] projections.
    ///
    /// # Errors
    ///
    /// Returns an error if the query cannot be executed.
    fn query(&self, query: &Query) -> StorageResult<QueryResults>;
}
