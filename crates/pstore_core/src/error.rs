//! Error types for PStore core.

use std::fmt;
use thiserror::Error;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// How a transaction body asked to stop early.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExitKind {
    /// The body called `commit()`.
    Commit,
    /// The body called `abort()`.
    Abort,
}

impl fmt::Display for ExitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Commit => f.write_str("commit"),
            Self::Abort => f.write_str("abort"),
        }
    }
}

/// Errors that can occur in PStore core operations.
///
/// Apart from the wrapped storage and codec failures, every variant is a
/// violation of the transaction contract and is not worth retrying.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Store error.
    #[error("storage error: {0}")]
    Storage(#[from] pstore_storage::StorageError),

    /// CBOR codec error.
    #[error("codec error: {0}")]
    Codec(#[from] pstore_codec::CodecError),

    /// Operation attempted outside an active transaction.
    #[error("not in transaction")]
    NotInTransaction,

    /// Mutation attempted in a read-only transaction.
    #[error("in read-only transaction")]
    ReadOnlyTransaction,

    /// A transaction is already active on this namespace handle.
    #[error("nested transaction")]
    NestedTransaction,

    /// `fetch` found no value for the key.
    #[error("undefined key")]
    UnknownKey,

    /// Serialized key exceeds the configured limit.
    #[error("key too large: {size} bytes exceeds limit of {limit}")]
    KeyTooLarge {
        /// Serialized size in bytes.
        size: usize,
        /// Configured limit in bytes.
        limit: usize,
    },

    /// Serialized value exceeds the configured limit.
    #[error("value too large: {size} bytes exceeds limit of {limit}")]
    ValueTooLarge {
        /// Serialized size in bytes.
        size: usize,
        /// Configured limit in bytes.
        limit: usize,
    },

    /// Control-flow signal produced by an explicit `commit()` or `abort()`
    /// inside a transaction body. It is consumed by the transaction runner
    /// and never returned from `transaction()`.
    #[error("transaction exited early via {0}")]
    EarlyExit(ExitKind),
}

impl CoreError {
    /// Creates a key too large error.
    pub fn key_too_large(size: usize, limit: usize) -> Self {
        Self::KeyTooLarge { size, limit }
    }

    /// Creates a value too large error.
    pub fn value_too_large(size: usize, limit: usize) -> Self {
        Self::ValueTooLarge { size, limit }
    }
}
