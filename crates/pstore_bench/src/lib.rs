//! Benchmark utilities.

#![deny(unsafe_code)]
#![warn(missing_docs)]

use pstore_core::{CoreError, PStore};
use pstore_storage::InMemoryStore;
use rand::distributions::Alphanumeric;
use rand::Rng;
use std::sync::Arc;

/// Generate a random alphanumeric key of the specified length.
pub fn random_key(len: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

/// Generate a batch of distinct random keys.
pub fn generate_keys(count: usize, len: usize) -> Vec<String> {
    (0..count)
        .map(|i| format!("{}-{i}", random_key(len)))
        .collect()
}

/// Generate random value bytes of the specified size.
pub fn random_value(size: usize) -> Vec<u8> {
    let mut rng = rand::thread_rng();
    (0..size).map(|_| rng.gen()).collect()
}

/// Opens a namespace over a fresh store with `keys` committed.
pub fn populated_namespace(keys: &[String], value_size: usize) -> Result<PStore, CoreError> {
    let db = PStore::new(Arc::new(InMemoryStore::new()), "bench");
    db.transaction(|ctx| {
        for key in keys {
            ctx.set(key.as_str(), random_value(value_size))?;
        }
        Ok::<_, CoreError>(())
    })?;
    Ok(db)
}
