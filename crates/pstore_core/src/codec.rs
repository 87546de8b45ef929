//! Key and value serialization.
//!
//! Keys and values go through separate functions even though both use
//! canonical CBOR: the encoded key is the key's identity (overlay map key and
//! store key name), while the encoded value is an opaque payload.

use crate::error::CoreResult;
use pstore_codec::{from_cbor, to_canonical_cbor};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;

/// The canonical serialized form of a logical key.
///
/// Two logical keys are the same key exactly when their `KeyBytes` are equal.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct KeyBytes(Vec<u8>);

impl KeyBytes {
    /// Wraps bytes that are already a canonical key encoding.
    #[must_use]
    pub fn from_vec(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// Returns the encoded bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Returns the encoded length in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the encoding is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for KeyBytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "KeyBytes(\"{}\")", self.0.escape_ascii())
    }
}

/// Serializes a logical key to its canonical identity.
///
/// # Errors
///
/// Returns an error if the key cannot be encoded.
pub fn encode_key<K: Serialize + ?Sized>(key: &K) -> CoreResult<KeyBytes> {
    Ok(KeyBytes(to_canonical_cbor(key)?))
}

/// Deserializes a logical key.
///
/// # Errors
///
/// Returns an error if the bytes do not decode as `K`.
pub fn decode_key<K: DeserializeOwned>(key: &KeyBytes) -> CoreResult<K> {
    Ok(from_cbor(key.as_bytes())?)
}

/// Serializes a value payload.
///
/// # Errors
///
/// Returns an error if the value cannot be encoded.
pub fn encode_value<V: Serialize + ?Sized>(value: &V) -> CoreResult<Vec<u8>> {
    Ok(to_canonical_cbor(value)?)
}

/// Deserializes a value payload.
///
/// # Errors
///
/// Returns an error if the bytes do not decode as `V`.
pub fn decode_value<V: DeserializeOwned>(bytes: &[u8]) -> CoreResult<V> {
    Ok(from_cbor(bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Point {
        x: i32,
        y: i32,
    }

    #[test]
    fn key_roundtrip() {
        let key = encode_key(&("user", 7u32)).unwrap();
        let decoded: (String, u32) = decode_key(&key).unwrap();
        assert_eq!(decoded, ("user".to_string(), 7));
    }

    #[test]
    fn value_roundtrip() {
        let bytes = encode_value(&Point { x: 1, y: -2 }).unwrap();
        let decoded: Point = decode_value(&bytes).unwrap();
        assert_eq!(decoded, Point { x: 1, y: -2 });
    }

    #[test]
    fn owned_and_borrowed_strings_are_the_same_key() {
        assert_eq!(
            encode_key("key").unwrap(),
            encode_key(&"key".to_string()).unwrap()
        );
    }

    #[test]
    fn text_and_byte_keys_are_distinct() {
        let text = encode_key("key").unwrap();
        let bytes = encode_key(&pstore_codec::Value::Bytes(b"key".to_vec())).unwrap();
        assert_ne!(text, bytes);
    }

    #[test]
    fn decode_wrong_shape_is_codec_error() {
        let key = encode_key("text").unwrap();
        let result = decode_key::<u64>(&key);
        assert!(matches!(result, Err(CoreError::Codec(_))));
    }

    #[test]
    fn debug_escapes_bytes() {
        // text string of length one: header 0x61, then 'a'
        let key = encode_key("a").unwrap();
        assert_eq!(format!("{key:?}"), "KeyBytes(\"aa\")");

        let raw = KeyBytes::from_vec(vec![0x00, b'z']);
        assert_eq!(format!("{raw:?}"), "KeyBytes(\"\\x00z\")");
    }
}
