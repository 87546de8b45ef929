//! Canonical CBOR encoder.

use crate::error::{CodecError, CodecResult};
use ciborium::value::Value;
use serde::Serialize;
use std::cmp::Ordering;

/// Encode a value to canonical CBOR bytes.
///
/// The value is first lowered to a dynamic [`Value`] tree, which is then
/// canonicalized (see [`canonicalize`]) and written out. Because integers and
/// floats are always written in their shortest form, the output is fully
/// determined by the logical value.
///
/// # Errors
///
/// Returns an error if the value cannot be serialized or contains NaN.
pub fn to_canonical_cbor<T: Serialize + ?Sized>(value: &T) -> CodecResult<Vec<u8>> {
    let tree = Value::serialized(value).map_err(|e| CodecError::encoding_failed(format!("{e:?}")))?;
    write_value(&canonicalize(tree)?)
}

/// Rewrite a value tree into canonical form.
///
/// Map entries are sorted by their encoded key (length-first, then
/// bytewise), recursively.
///
/// # Errors
///
/// Returns an error if the tree contains NaN or a map with duplicate keys.
pub fn canonicalize(value: Value) -> CodecResult<Value> {
    match value {
        Value::Float(f) if f.is_nan() => Err(CodecError::NaNForbidden),
        Value::Array(items) => Ok(Value::Array(
            items
                .into_iter()
                .map(canonicalize)
                .collect::<CodecResult<_>>()?,
        )),
        Value::Map(entries) => canonicalize_map(entries),
        Value::Tag(tag, inner) => Ok(Value::Tag(tag, Box::new(canonicalize(*inner)?))),
        other => Ok(other),
    }
}

fn canonicalize_map(entries: Vec<(Value, Value)>) -> CodecResult<Value> {
    // Encode all keys first to sort by their canonical byte representation
    let mut encoded: Vec<(Vec<u8>, Value, Value)> = Vec::with_capacity(entries.len());
    for (key, value) in entries {
        let key = canonicalize(key)?;
        let key_bytes = write_value(&key)?;
        encoded.push((key_bytes, key, canonicalize(value)?));
    }

    encoded.sort_by(|a, b| cmp_encoded(&a.0, &b.0));

    if encoded.windows(2).any(|pair| pair[0].0 == pair[1].0) {
        return Err(CodecError::encoding_failed("duplicate map key"));
    }

    Ok(Value::Map(
        encoded.into_iter().map(|(_, key, value)| (key, value)).collect(),
    ))
}

/// Length-first, then bytewise.
fn cmp_encoded(a: &[u8], b: &[u8]) -> Ordering {
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

fn write_value(value: &Value) -> CodecResult<Vec<u8>> {
    let mut buffer = Vec::new();
    ciborium::into_writer(value, &mut buffer)
        .map_err(|e| CodecError::encoding_failed(format!("{e:?}")))?;
    Ok(buffer)
}
