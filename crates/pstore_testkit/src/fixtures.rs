//! Test fixtures and namespace helpers.
//!
//! Provides convenience functions for opening namespaces over a fresh
//! in-memory store and for checking that tests leave no store transaction
//! open.

use pstore_core::{Config, PStore};
use pstore_storage::InMemoryStore;
use std::sync::Arc;

/// A namespace over its own in-memory store.
///
/// Dereferences to the [`PStore`] handle. On drop, asserts that every store
/// transaction was closed.
pub struct TestNamespace {
    /// The namespace handle.
    pub db: PStore,
    store: Arc<InMemoryStore>,
}

impl TestNamespace {
    /// Opens a namespace named `test.pstore` over a fresh store.
    pub fn new() -> Self {
        Self::named("test.pstore")
    }

    /// Opens a namespace with the given name over a fresh store.
    pub fn named(name: &str) -> Self {
        Self::with_config(name, Config::default())
    }

    /// Opens a namespace with a custom configuration over a fresh store.
    pub fn with_config(name: &str, config: Config) -> Self {
        let store = Arc::new(InMemoryStore::new());
        Self {
            db: PStore::with_config(store.clone(), name, config),
            store,
        }
    }

    /// Returns the underlying store.
    pub fn store(&self) -> &Arc<InMemoryStore> {
        &self.store
    }

    /// Opens another namespace over the same store.
    pub fn sibling(&self, name: &str) -> PStore {
        PStore::new(self.store.clone(), name)
    }

    /// Asserts that no store transaction is open.
    pub fn assert_no_active_transactions(&self) {
        let active = self.store.active_transactions();
        assert!(active.is_empty(), "store transactions left open: {active:?}");
    }
}

impl Default for TestNamespace {
    fn default() -> Self {
        Self::new()
    }
}

impl std::ops::Deref for TestNamespace {
    type Target = PStore;

    fn deref(&self) -> &Self::Target {
        &self.db
    }
}

impl Drop for TestNamespace {
    fn drop(&mut self) {
        if !std::thread::panicking() {
            self.assert_no_active_transactions();
        }
    }
}

/// Runs a test with a fresh namespace.
///
/// # Example
///
/// ```rust
/// use pstore_core::CoreError;
/// use pstore_testkit::with_namespace;
///
/// with_namespace(|db| {
///     let keys = db.read_transaction(|ctx| ctx.keys::<String>()).unwrap();
///     assert_eq!(keys.into_value(), Some(Vec::new()));
/// });
/// ```
pub fn with_namespace<F, R>(f: F) -> R
where
    F: FnOnce(&PStore) -> R,
{
    let ns = TestNamespace::new();
    f(&ns)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pstore_core::CoreError;

    #[test]
    fn namespace_derefs_to_handle() {
        let ns = TestNamespace::named("fixture");
        assert_eq!(ns.path(), "fixture");
        assert!(!ns.in_transaction());
    }

    #[test]
    fn siblings_share_the_store() {
        let ns = TestNamespace::new();
        let other = ns.sibling("other");

        other
            .transaction(|ctx| {
                ctx.set("k", 1u8)?;
                Ok::<_, CoreError>(())
            })
            .unwrap();

        let entities = ns.store().entities();
        assert_eq!(entities.len(), 1);
        assert!(entities[0].key().is_descendant_of(other.root_key()));
        assert!(!entities[0].key().is_descendant_of(ns.root_key()));
        let keys = ns.read_transaction(|ctx| ctx.keys::<String>()).unwrap();
        assert_eq!(keys.into_value(), Some(Vec::new()));
    }

    #[test]
    fn with_namespace_returns_closure_result() {
        let value = with_namespace(|db| db.path().len());
        assert_eq!(value, "test.pstore".len());
    }
}
