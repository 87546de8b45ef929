//! The dictionary view of a namespace inside one transaction.

use super::overlay::{Lookup, Overlay};
use super::state::{TransactionMode, TransactionOutcome, TransactionState};
use crate::codec::{decode_key, decode_value, encode_key, encode_value, KeyBytes};
use crate::config::Config;
use crate::error::{CoreError, CoreResult, ExitKind};
use pstore_storage::{Entity, EntityStore, Key, Query, TxnHandle};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::convert::Infallible;
use std::fmt;

/// Handle passed to a transaction body.
///
/// Reads see the transaction's own uncommitted writes layered over the
/// committed store contents. Writes go to the store transaction immediately
/// and are recorded in an overlay until commit.
///
/// Every operation fails with [`CoreError::NotInTransaction`] once the
/// transaction has committed or aborted.
pub struct TransactionContext<'a> {
    store: &'a dyn EntityStore,
    root: &'a Key,
    config: &'a Config,
    mode: TransactionMode,
    state: TransactionState,
    txn: Option<TxnHandle>,
    overlay: Overlay,
    exit: Option<ExitKind>,
}

impl<'a> TransactionContext<'a> {
    pub(crate) fn new(
        store: &'a dyn EntityStore,
        root: &'a Key,
        config: &'a Config,
        mode: TransactionMode,
    ) -> Self {
        Self {
            store,
            root,
            config,
            mode,
            state: TransactionState::NotStarted,
            txn: None,
            overlay: Overlay::new(),
            exit: None,
        }
    }

    /// Opens the store transaction.
    pub(crate) fn begin(&mut self) -> CoreResult<()> {
        if self.state != TransactionState::NotStarted {
            return Err(CoreError::NestedTransaction);
        }
        let txn = self.store.begin_transaction()?;
        tracing::debug!(namespace = %self.root, %txn, mode = ?self.mode, "transaction started");
        self.txn = Some(txn);
        self.state = TransactionState::Active;
        Ok(())
    }

    /// Returns the current state.
    #[must_use]
    pub fn state(&self) -> TransactionState {
        self.state
    }

    /// Returns the access mode.
    #[must_use]
    pub fn mode(&self) -> TransactionMode {
        self.mode
    }

    /// Returns true if writes are rejected.
    #[must_use]
    pub fn is_read_only(&self) -> bool {
        self.mode.is_read_only()
    }

    /// Checks if the transaction is still active.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.state == TransactionState::Active
    }

    /// Number of keys written or deleted so far in this transaction.
    #[must_use]
    pub fn pending_changes(&self) -> usize {
        self.overlay.added_len() + self.overlay.deleted_len()
    }

    /// Returns the value stored under `key`, or `None` if there is none.
    ///
    /// Writes made earlier in this transaction are visible.
    ///
    /// # Errors
    ///
    /// Returns an error outside an active transaction, if the key or the
    /// stored value cannot be (de)serialized, or if the store fails.
    pub fn get<K, V>(&self, key: &K) -> CoreResult<Option<V>>
    where
        K: Serialize + ?Sized,
        V: DeserializeOwned,
    {
        let txn = self.ensure_active()?;
        let key = encode_key(key)?;
        let raw = self.lookup_raw(txn, &key)?;
        tracing::trace!(key = ?key, hit = raw.is_some(), "get");
        raw.as_deref().map(decode_value).transpose()
    }

    /// Like [`get`](Self::get), but an absent key is an error.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::UnknownKey`] if there is no value for `key`, or
    /// any error `get` can return.
    pub fn fetch<K, V>(&self, key: &K) -> CoreResult<V>
    where
        K: Serialize + ?Sized,
        V: DeserializeOwned,
    {
        self.get(key)?.ok_or(CoreError::UnknownKey)
    }

    /// Stores `value` under `key` and returns the value.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::ReadOnlyTransaction`] in a read-only transaction,
    /// a size error if the serialized key or value exceeds the configured
    /// limit, or a store error.
    pub fn set<K, V>(&mut self, key: &K, value: V) -> CoreResult<V>
    where
        K: Serialize + ?Sized,
        V: Serialize,
    {
        let txn = self.ensure_writable()?;
        let key = encode_key(key)?;
        if key.len() > self.config.max_key_size {
            return Err(CoreError::key_too_large(key.len(), self.config.max_key_size));
        }
        let bytes = encode_value(&value)?;
        if bytes.len() > self.config.max_value_size {
            return Err(CoreError::value_too_large(
                bytes.len(),
                self.config.max_value_size,
            ));
        }

        self.store
            .put(&txn, Entity::new(self.entity_key(&key), bytes.clone()))?;
        tracing::trace!(key = ?key, size = bytes.len(), "set");
        self.overlay.record_set(key, bytes);
        Ok(value)
    }

    /// Removes `key` and returns the value it had, if any.
    ///
    /// Deleting an absent key is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::ReadOnlyTransaction`] in a read-only transaction,
    /// or a codec or store error.
    pub fn delete<K, V>(&mut self, key: &K) -> CoreResult<Option<V>>
    where
        K: Serialize + ?Sized,
        V: DeserializeOwned,
    {
        let txn = self.ensure_writable()?;
        let key = encode_key(key)?;
        let previous = self.lookup_raw(&txn, &key)?;
        let value = previous.as_deref().map(decode_value).transpose()?;

        self.store.delete(&txn, &[self.entity_key(&key)])?;
        tracing::trace!(key = ?key, existed = previous.is_some(), "delete");
        self.overlay.record_delete(key, previous);
        Ok(value)
    }

    /// Returns every key currently visible in the namespace.
    ///
    /// Keys that exist in the store come first, in store order, followed by
    /// keys only written in this transaction, in the order they were first
    /// written. Keys deleted in this transaction are left out.
    ///
    /// # Errors
    ///
    /// Returns an error outside an active transaction, if the store query
    /// fails, or if a stored key does not decode as `K`.
    pub fn keys<K: DeserializeOwned>(&self) -> CoreResult<Vec<K>> {
        self.key_bytes()?.iter().map(decode_key).collect()
    }

    /// Returns true if `key` is among [`keys`](Self::keys).
    ///
    /// # Errors
    ///
    /// Returns an error outside an active transaction or if the store query
    /// fails.
    pub fn contains<K: Serialize + ?Sized>(&self, key: &K) -> CoreResult<bool> {
        self.ensure_active()?;
        let key = encode_key(key)?;
        Ok(self.key_bytes()?.contains(&key))
    }

    /// Returns the number of visible keys.
    ///
    /// # Errors
    ///
    /// Returns an error outside an active transaction or if the store query
    /// fails.
    pub fn len(&self) -> CoreResult<usize> {
        Ok(self.key_bytes()?.len())
    }

    /// Returns true if no key is visible.
    ///
    /// # Errors
    ///
    /// Same as [`len`](Self::len).
    pub fn is_empty(&self) -> CoreResult<bool> {
        Ok(self.len()? == 0)
    }

    /// Commits now and ends the transaction body.
    ///
    /// On success this returns `Err(CoreError::EarlyExit(ExitKind::Commit))`
    /// so that `?` skips the rest of the body. The runner turns that into
    /// [`TransactionOutcome::CommittedEarly`]. Allowed in read-only
    /// transactions.
    ///
    /// Once this succeeds the outcome is fixed: if the body goes on to return
    /// some other `Err`, that error is discarded.
    ///
    /// # Errors
    ///
    /// Always returns an error: the early-exit signal on success, or the
    /// store error if the commit fails.
    pub fn commit(&mut self) -> CoreResult<Infallible> {
        self.ensure_active()?;
        self.finish_commit()?;
        self.exit = Some(ExitKind::Commit);
        Err(CoreError::EarlyExit(ExitKind::Commit))
    }

    /// Discards every write and ends the transaction body.
    ///
    /// On success this returns `Err(CoreError::EarlyExit(ExitKind::Abort))`
    /// so that `?` skips the rest of the body. The runner turns that into
    /// [`TransactionOutcome::Aborted`].
    ///
    /// As with [`commit`](Self::commit), a later body error is discarded.
    ///
    /// # Errors
    ///
    /// Always returns an error: the early-exit signal on success, or the
    /// store error if the rollback fails.
    pub fn abort(&mut self) -> CoreResult<Infallible> {
        self.ensure_active()?;
        self.finish_rollback()?;
        self.exit = Some(ExitKind::Abort);
        Err(CoreError::EarlyExit(ExitKind::Abort))
    }

    /// Ends the transaction according to how the body finished.
    ///
    /// A recorded early exit wins over whatever the body returned. A body
    /// error rolls back and is returned unchanged. A normal return commits.
    pub(crate) fn settle<T, E>(&mut self, result: Result<T, E>) -> Result<TransactionOutcome<T>, E>
    where
        E: From<CoreError>,
    {
        if let Some(exit) = self.exit {
            // Usually the exit signal itself; the body may also have swallowed
            // it and failed afterwards.
            if result.is_err() {
                tracing::debug!(namespace = %self.root, %exit, "body error discarded after early exit");
            }
            return Ok(TransactionOutcome::from_exit(exit));
        }

        match result {
            Ok(value) if self.is_active() => {
                self.finish_commit()?;
                Ok(TransactionOutcome::Completed(value))
            }
            // The body swallowed the failure of its own commit() or abort()
            Ok(_) => Ok(TransactionOutcome::Aborted),
            Err(err) => {
                if self.is_active() {
                    if let Err(rollback_err) = self.finish_rollback() {
                        tracing::warn!(
                            namespace = %self.root,
                            error = %rollback_err,
                            "rollback after failed transaction body failed"
                        );
                    }
                }
                Err(err)
            }
        }
    }

    fn finish_commit(&mut self) -> CoreResult<()> {
        let txn = self.take_txn()?;
        let changes = self.pending_changes();
        self.overlay.clear();

        if let Err(err) = self.store.commit(&txn) {
            self.state = TransactionState::Aborted;
            if self.store.is_active(&txn) {
                if let Err(rollback_err) = self.store.rollback(&txn) {
                    tracing::warn!(%txn, error = %rollback_err, "rollback after failed commit failed");
                }
            }
            tracing::debug!(namespace = %self.root, %txn, error = %err, "commit failed");
            return Err(err.into());
        }

        self.state = TransactionState::Committed;
        tracing::debug!(namespace = %self.root, %txn, changes, "transaction committed");
        Ok(())
    }

    fn finish_rollback(&mut self) -> CoreResult<()> {
        let txn = self.take_txn()?;
        self.state = TransactionState::Aborted;
        self.overlay.clear();

        if self.store.is_active(&txn) {
            self.store.rollback(&txn)?;
        }
        tracing::debug!(namespace = %self.root, %txn, "transaction rolled back");
        Ok(())
    }

    fn take_txn(&mut self) -> CoreResult<TxnHandle> {
        if !self.is_active() {
            return Err(CoreError::NotInTransaction);
        }
        self.txn.take().ok_or(CoreError::NotInTransaction)
    }

    fn ensure_active(&self) -> CoreResult<&TxnHandle> {
        match (&self.state, &self.txn) {
            (TransactionState::Active, Some(txn)) if self.store.is_active(txn) => Ok(txn),
            _ => Err(CoreError::NotInTransaction),
        }
    }

    fn ensure_writable(&self) -> CoreResult<TxnHandle> {
        let txn = *self.ensure_active()?;
        if self.is_read_only() {
            return Err(CoreError::ReadOnlyTransaction);
        }
        Ok(txn)
    }

    fn entity_key(&self, key: &KeyBytes) -> Key {
        Key::from_path(Some(self.root), self.config.kind.as_str(), key.as_bytes())
    }

    /// Current serialized value of a key: overlay first, then the store.
    fn lookup_raw(&self, txn: &TxnHandle, key: &KeyBytes) -> CoreResult<Option<Vec<u8>>> {
        match self.overlay.lookup(key) {
            Lookup::Added(bytes) => Ok(Some(bytes.to_vec())),
            Lookup::Deleted => Ok(None),
            Lookup::Untouched => match self.store.get(txn, &self.entity_key(key)) {
                Ok(entity) => Ok(entity.into_parts().1),
                Err(err) if err.is_not_found() => Ok(None),
                Err(err) => Err(err.into()),
            },
        }
    }

    fn key_bytes(&self) -> CoreResult<Vec<KeyBytes>> {
        self.ensure_active()?;
        let query = Query::new(self.config.kind.as_str())
            .ancestor(self.root.clone())
            .keys_only();
        let store_keys = self
            .store
            .query(&query)?
            .map(|entity| KeyBytes::from_vec(entity.key().name().to_vec()))
            .collect();
        Ok(self.overlay.merge_keys(store_keys))
    }
}

impl Drop for TransactionContext<'_> {
    fn drop(&mut self) {
        if self.is_active() {
            tracing::debug!(namespace = %self.root, "rolling back unfinished transaction");
            if let Err(err) = self.finish_rollback() {
                tracing::warn!(namespace = %self.root, error = %err, "rollback on drop failed");
            }
        }
    }
}

impl fmt::Debug for TransactionContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransactionContext")
            .field("root", self.root)
            .field("mode", &self.mode)
            .field("state", &self.state)
            .field("txn", &self.txn)
            .field("overlay", &self.overlay)
            .finish_non_exhaustive()
    }
}
