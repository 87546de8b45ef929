//! # PStore Codec
//!
//! Deterministic CBOR encoding/decoding for PStore keys and values.
//!
//! Any type implementing `serde::Serialize` can be encoded and any type
//! implementing `serde::de::DeserializeOwned` can be decoded. Encoding is
//! canonical, which is what makes encoded keys usable as identities:
//! - Identical inputs produce identical bytes
//! - Map entries are sorted by their encoded key (length-first, then bytewise),
//!   so `HashMap` iteration order never leaks into the output
//! - Integers and floats use their shortest lossless encoding
//! - NaN values are rejected
//!
//! ## Usage
//!
//! ```
//! use pstore_codec::{from_cbor, to_canonical_cbor};
//!
//! let bytes = to_canonical_cbor(&("hello", 42u32)).unwrap();
//! let decoded: (String, u32) = from_cbor(&bytes).unwrap();
//! assert_eq!(decoded, ("hello".to_string(), 42));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod decoder;
mod encoder;
mod error;

pub use decoder::from_cbor;
pub use encoder::{canonicalize, to_canonical_cbor};
pub use error::{CodecError, CodecResult};

/// The dynamic CBOR value type used for canonicalization.
pub use ciborium::value::Value;
