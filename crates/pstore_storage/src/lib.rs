//! # PStore Storage
//!
//! The keyed-entity store contract that PStore persists into.
//!
//! This crate provides the lowest-level storage abstraction for PStore.
//! Stores are **opaque entity stores** - they hold one serialized value slot
//! per hierarchical key and never interpret it.
//!
//! ## Design Principles
//!
//! - Stores expose get / put / delete / keys-only query by key
//! - All mutations happen under a store transaction ([`TxnHandle`])
//! - Must be `Send + Sync` so handles can be shared across threads
//! - PStore owns all key and value serialization
//!
//! ## Available Stores
//!
//! - [`InMemoryStore`] - For testing and ephemeral storage
//!
//! ## Example
//!
//! ```rust
//! use pstore_storage::{Entity, EntityStore, InMemoryStore, Key};
//!
//! let store = InMemoryStore::new();
//! let key = Key::from_path(None, "PStore", "db");
//!
//! let txn = store.begin_transaction().unwrap();
//! store.put(&txn, Entity::new(key.clone(), b"hello".to_vec())).unwrap();
//! store.commit(&txn).unwrap();
//!
//! let txn = store.begin_transaction().unwrap();
//! let entity = store.get(&txn, &key).unwrap();
//! assert_eq!(entity.value(), Some(&b"hello"[..]));
//! store.rollback(&txn).unwrap();
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod entity;
mod error;
mod key;
mod memory;
mod store;

pub use entity::{Entity, Query, QueryResults};
pub use error::{StorageError, StorageResult};
pub use key::{Key, PathElement};
pub use memory::InMemoryStore;
pub use store::{EntityStore, TxnHandle};
