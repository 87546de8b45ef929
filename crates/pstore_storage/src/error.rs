//! Error types for store operations.

use crate::key::Key;
use crate::store::TxnHandle;
use thiserror::Error;

/// Result type for store operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// No entity is stored under the requested key.
    #[error("entity not found: {key}")]
    EntityNotFound {
        /// The key that was looked up.
        key: Key,
    },

    /// The transaction has already been committed or rolled back.
    #[error("transaction {txn} is not active")]
    TransactionNotActive {
        /// The finished transaction.
        txn: TxnHandle,
    },

    /// The transaction handle was not issued by this store.
    #[error("unknown transaction {txn}")]
    UnknownTransaction {
        /// The unrecognized transaction.
        txn: TxnHandle,
    },

    /// The backing service failed.
    #[error("store backend error: {0}")]
    Backend(String),

    /// A failure injected by a test harness.
    #[error("injected failure: {0}")]
    Injected(String),
}

impl StorageError {
    /// Creates an entity not found error.
    pub fn entity_not_found(key: &Key) -> Self {
        Self::EntityNotFound { key: key.clone() }
    }

    /// Creates a backend error.
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend(message.into())
    }

    /// Creates an injected failure.
    pub fn injected(message: impl Into<String>) -> Self {
        Self::Injected(message.into())
    }

    /// Returns true if this is an [`StorageError::EntityNotFound`] error.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::EntityNotFound { .. })
    }
}
