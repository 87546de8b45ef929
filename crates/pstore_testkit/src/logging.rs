//! Tracing setup for test binaries.

use std::sync::Once;
use tracing_subscriber::EnvFilter;

static INIT: Once = Once::new();

/// Installs a tracing subscriber for tests. Safe to call multiple times.
///
/// The filter comes from `RUST_LOG` and defaults to `warn`, so
/// `RUST_LOG=pstore_core=debug cargo test` shows transaction boundaries.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
        // Another harness may already have installed a global subscriber
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    });
}
