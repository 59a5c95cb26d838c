//! Scalar and collection converters between generic values and typed data.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use k8s_openapi::ByteString;
use std::collections::BTreeMap;

use crate::error::Result;
use crate::value::{Map, Value};

/// Narrows a generic map to a string map.
///
/// Fails with a type mismatch naming the offending key when any value is
/// not a string.
pub fn expand_string_map(m: &Map) -> Result<BTreeMap<String, String>> {
    m.iter()
        .map(|(k, v)| -> Result<(String, String)> { Ok((k.clone(), v.expect_str(k)?.to_string())) })
        .collect()
}

/// Decodes raw byte values (e.g. secret data) to text.
///
/// Invalid UTF-8 sequences are replaced rather than rejected.
pub fn byte_map_to_string_map(m: &BTreeMap<String, ByteString>) -> BTreeMap<String, String> {
    m.iter()
        .map(|(k, v)| (k.clone(), String::from_utf8_lossy(&v.0).into_owned()))
        .collect()
}

/// Encodes every string value of a generic map with standard base64.
pub fn base64_encode_string_map(m: &Map) -> Result<Map> {
    m.iter()
        .map(|(k, v)| -> Result<(String, Value)> {
            let encoded = STANDARD.encode(v.expect_str(k)?);
            Ok((k.clone(), Value::String(encoded)))
        })
        .collect()
}

/// Narrows a generic sequence to a string sequence.
pub fn slice_of_string(slice: &[Value]) -> Result<Vec<String>> {
    slice
        .iter()
        .enumerate()
        .map(|(i, v)| v.expect_str(&format!("[{}]", i)).map(str::to_string))
        .collect()
}

/// Wraps a string as a generic value.
pub fn iface_from_string(s: &str) -> Value {
    Value::String(s.to_string())
}

/// Wraps a string in `Some`.
pub fn ptr_to_string(s: impl Into<String>) -> Option<String> {
    Some(s.into())
}

/// Wraps a 64-bit integer in `Some`.
pub fn ptr_to_int(i: i64) -> Option<i64> {
    Some(i)
}

/// Wraps a 32-bit integer in `Some`.
pub fn ptr_to_int32(i: i32) -> Option<i32> {
    Some(i)
}

/// Wraps a boolean in `Some`.
pub fn ptr_to_bool(b: bool) -> Option<bool> {
    Some(b)
}
