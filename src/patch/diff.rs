//! Patch generation for mutable metadata maps.

use tracing::debug;

use super::change::ChangeSource;
use super::operation::{PatchOperation, PatchOperations};
use crate::error::Result;
use crate::value::{Map, Value};

/// Metadata fields that can be updated in place, in patch order.
const PATCHABLE_FIELDS: [&str; 2] = ["annotations", "labels"];

/// Builds patch operations for changed metadata labels and annotations.
///
/// `key_prefix` locates the metadata block in the configuration state
/// (e.g. `metadata.0.`), `path_prefix` locates it in the API object
/// (e.g. `/metadata/`). Annotation operations come before label operations.
pub fn patch_metadata<C>(key_prefix: &str, path_prefix: &str, d: &C) -> Result<PatchOperations>
where
    C: ChangeSource + ?Sized,
{
    let mut ops = PatchOperations::new();
    for field in PATCHABLE_FIELDS {
        let key = format!("{}{}", key_prefix, field);
        if !d.has_change(&key) {
            continue;
        }
        let (old, new) = d.get_change(&key);
        let diff = diff_string_map(
            &format!("{}{}", path_prefix, field),
            &change_map(&old, &key)?,
            &change_map(&new, &key)?,
        )?;
        debug!(field, operations = diff.len(), "diffed metadata field");
        ops.extend(diff);
    }
    Ok(ops)
}

/// Computes the operations turning `old` into `new`.
///
/// Keys only in `old` are removed, keys only in `new` are added and keys
/// whose value changed are replaced. Removals come first, each group in key
/// order.
pub fn diff_string_map(path_prefix: &str, old: &Map, new: &Map) -> Result<PatchOperations> {
    let prefix = path_prefix.trim_end_matches('/');
    let mut ops = PatchOperations::new();

    for (key, _) in old.iter() {
        if !new.has(key) {
            ops.push(PatchOperation::remove(pointer(prefix, key)));
        }
    }

    for (key, value) in new.iter() {
        let new_value = value.expect_str(key)?;
        match old.get(key) {
            Some(old_value) if old_value.expect_str(key)? == new_value => {}
            Some(_) => ops.push(PatchOperation::replace(pointer(prefix, key), new_value)),
            None => ops.push(PatchOperation::add(pointer(prefix, key), new_value)),
        }
    }

    Ok(ops)
}

/// Reads a change value as a map; absent values are empty maps.
fn change_map(value: &Value, key: &str) -> Result<Map> {
    match value {
        Value::Null => Ok(Map::new()),
        other => other.expect_map(key).cloned(),
    }
}

/// Appends `key` to `prefix` as an escaped JSON Pointer token.
fn pointer(prefix: &str, key: &str) -> String {
    format!("{}/{}", prefix, key.replace('~', "~0").replace('/', "~1"))
}
