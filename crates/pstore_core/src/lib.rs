//! # PStore Core
//!
//! A transactional, persistent dictionary layered over a keyed-entity store.
//!
//! This crate provides:
//! - Namespace handles ([`PStore`]) that isolate one dictionary per name
//! - Transactions with read-your-writes, early commit and abort
//! - Key enumeration that merges committed keys with uncommitted writes
//! - Canonical key serialization, so equal keys always collide
//!
//! Keys and values are any `serde` types. Two keys are the same key exactly
//! when their canonical CBOR encodings are equal, so `"a"` and `b"a"` are
//! distinct keys.
//!
//! ## Example
//!
//! ```rust
//! use pstore_core::{CoreError, PStore, TransactionOutcome};
//! use pstore_storage::InMemoryStore;
//! use std::sync::Arc;
//!
//! let db = PStore::new(Arc::new(InMemoryStore::new()), "inventory");
//!
//! let outcome = db.transaction(|ctx| {
//!     ctx.set("apples", 3u32)?;
//!     ctx.set("pears", 5u32)?;
//!     ctx.abort()?;
//!     Ok::<_, CoreError>(())
//! })?;
//! assert_eq!(outcome, TransactionOutcome::Aborted);
//!
//! let keys = db.read_transaction(|ctx| ctx.keys::<String>())?;
//! assert_eq!(keys.into_value(), Some(Vec::new()));
//! # Ok::<(), CoreError>(())
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod codec;
mod config;
mod error;
mod namespace;
mod transaction;

pub use codec::KeyBytes;
pub use config::{Config, DEFAULT_KIND};
pub use error::{CoreError, CoreResult, ExitKind};
pub use namespace::PStore;
pub use transaction::{TransactionContext, TransactionMode, TransactionOutcome, TransactionState};
