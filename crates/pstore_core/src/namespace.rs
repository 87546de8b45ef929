//! Namespace handle.

use crate::config::Config;
use crate::error::{CoreError, CoreResult};
use crate::transaction::{TransactionContext, TransactionMode, TransactionOutcome};
use pstore_storage::{EntityStore, Key};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// A named, persistent dictionary stored in an [`EntityStore`].
///
/// All records of the namespace are children of a single root key, so
/// several handles with different names can share one store without seeing
/// each other's keys.
///
/// Data is only reachable inside a transaction:
///
/// ```rust
/// use pstore_core::{CoreError, PStore};
/// use pstore_storage::InMemoryStore;
/// use std::sync::Arc;
///
/// let db = PStore::new(Arc::new(InMemoryStore::new()), "settings");
///
/// db.transaction(|ctx| {
///     ctx.set("theme", "dark")?;
///     Ok::<_, CoreError>(())
/// })?;
///
/// let theme = db
///     .read_transaction(|ctx| ctx.get::<_, String>("theme"))?
///     .into_value()
///     .flatten();
/// assert_eq!(theme.as_deref(), Some("dark"));
/// # Ok::<(), CoreError>(())
/// ```
pub struct PStore {
    store: Arc<dyn EntityStore>,
    name: String,
    root_key: Key,
    config: Config,
    in_transaction: AtomicBool,
}

impl PStore {
    /// Creates a handle for the namespace `name` with default configuration.
    pub fn new(store: Arc<dyn EntityStore>, name: impl Into<String>) -> Self {
        Self::with_config(store, name, Config::default())
    }

    /// Creates a handle with a custom configuration.
    pub fn with_config(store: Arc<dyn EntityStore>, name: impl Into<String>, config: Config) -> Self {
        let name = name.into();
        let root_key = Key::from_path(None, config.kind.as_str(), name.as_bytes());
        Self {
            store,
            name,
            root_key,
            config,
            in_transaction: AtomicBool::new(false),
        }
    }

    /// Returns the namespace name.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.name
    }

    /// Returns the root key every record of this namespace lives under.
    #[must_use]
    pub fn root_key(&self) -> &Key {
        &self.root_key
    }

    /// Returns the kind label.
    #[must_use]
    pub fn kind(&self) -> &str {
        &self.config.kind
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns true while a transaction is running on this handle.
    #[must_use]
    pub fn in_transaction(&self) -> bool {
        self.in_transaction.load(Ordering::Acquire)
    }

    /// Runs `body` in a read-write transaction.
    ///
    /// The transaction commits when the body returns `Ok`, and rolls back
    /// when it returns `Err` (the error is passed through unchanged) or
    /// panics. Calling `commit()` or `abort()` on the context ends the body
    /// early; see [`TransactionOutcome`].
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::NestedTransaction`] if this handle already has a
    /// transaction running, a store error if the transaction cannot be
    /// opened or committed, or the body's own error.
    pub fn transaction<T, E, F>(&self, body: F) -> Result<TransactionOutcome<T>, E>
    where
        F: FnOnce(&mut TransactionContext<'_>) -> Result<T, E>,
        E: From<CoreError>,
    {
        self.transaction_with_mode(TransactionMode::ReadWrite, body)
    }

    /// Runs `body` in a read-only transaction.
    ///
    /// # Errors
    ///
    /// Same as [`transaction`](Self::transaction). Writes inside the body
    /// fail with [`CoreError::ReadOnlyTransaction`].
    pub fn read_transaction<T, E, F>(&self, body: F) -> Result<TransactionOutcome<T>, E>
    where
        F: FnOnce(&mut TransactionContext<'_>) -> Result<T, E>,
        E: From<CoreError>,
    {
        self.transaction_with_mode(TransactionMode::ReadOnly, body)
    }

    /// Runs `body` in a transaction with the given mode.
    ///
    /// # Errors
    ///
    /// Same as [`transaction`](Self::transaction).
    pub fn transaction_with_mode<T, E, F>(
        &self,
        mode: TransactionMode,
        body: F,
    ) -> Result<TransactionOutcome<T>, E>
    where
        F: FnOnce(&mut TransactionContext<'_>) -> Result<T, E>,
        E: From<CoreError>,
    {
        let _guard = self.enter()?;

        // Dropped before the guard, so a panicking body is rolled back
        // while the handle is still marked busy.
        let mut ctx =
            TransactionContext::new(self.store.as_ref(), &self.root_key, &self.config, mode);
        ctx.begin()?;

        let result = body(&mut ctx);
        ctx.settle(result)
    }

    fn enter(&self) -> CoreResult<ActiveGuard<'_>> {
        self.in_transaction
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| CoreError::NestedTransaction)?;
        Ok(ActiveGuard {
            flag: &self.in_transaction,
        })
    }
}

impl fmt::Debug for PStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PStore")
            .field("name", &self.name)
            .field("root_key", &self.root_key)
            .field("config", &self.config)
            .field("in_transaction", &self.in_transaction())
            .finish_non_exhaustive()
    }
}

/// Clears the handle's busy flag when the transaction ends, including by panic.
struct ActiveGuard<'a> {
    flag: &'a AtomicBool,
}

impl Drop for ActiveGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}
