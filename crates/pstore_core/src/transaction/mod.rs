//! Transactions over a namespace.
//!
//! A transaction wraps exactly one store transaction. Its body gets a
//! [`TransactionContext`] with:
//! - **Read-your-writes**: reads consult the transaction's own writes first
//! - **Early exit**: `commit()` and `abort()` end the body immediately
//! - **Rollback on failure**: a body error or panic discards every write

mod context;
mod overlay;
mod state;

pub use context::TransactionContext;
pub use state::{TransactionMode, TransactionOutcome, TransactionState};
