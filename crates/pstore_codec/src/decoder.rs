//! CBOR decoder.

use crate::error::{CodecError, CodecResult};
use serde::de::DeserializeOwned;

/// Decode a value from CBOR bytes.
///
/// The input must contain exactly one encoded value.
///
/// # Errors
///
/// Returns an error if the bytes are not valid CBOR, do not match the shape
/// of `T`, or continue past the end of the value.
pub fn from_cbor<T: DeserializeOwned>(bytes: &[u8]) -> CodecResult<T> {
    let mut remaining = bytes;
    let value = ciborium::from_reader(&mut remaining)
        .map_err(|e| CodecError::decoding_failed(format!("{e:?}")))?;

    if !remaining.is_empty() {
        return Err(CodecError::TrailingBytes {
            count: remaining.len(),
        });
    }

    Ok(value)
}
