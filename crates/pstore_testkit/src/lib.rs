//! # PStore Testkit
//!
//! Test utilities for PStore.
//!
//! This crate provides:
//! - Test fixtures that open namespaces over a fresh store
//! - A fault-injecting store wrapper
//! - A reference model of namespace semantics
//! - Property-based test generators using proptest
//! - Tracing setup for test binaries
//!
//! ## Usage
//!
//! ```rust
//! use pstore_core::CoreError;
//! use pstore_testkit::prelude::*;
//!
//! with_namespace(|db| {
//!     db.transaction(|ctx| {
//!         ctx.set("k", 1u32)?;
//!         Ok::<_, CoreError>(())
//!     })
//!     .unwrap();
//! });
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod faulty;
pub mod fixtures;
pub mod generators;
pub mod logging;
pub mod model;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::faulty::*;
    pub use crate::fixtures::*;
    pub use crate::generators::*;
    pub use crate::logging::*;
    pub use crate::model::*;
}

pub use faulty::*;
pub use fixtures::*;
pub use generators::*;
pub use logging::*;
pub use model::*;
