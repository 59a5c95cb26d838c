//! JSON Patch operations.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::value::Value;

/// PatchOperation is one RFC 6902 instruction of a partial update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum PatchOperation {
    Add { path: String, value: Value },
    Replace { path: String, value: Value },
    Remove { path: String },
}

impl PatchOperation {
    pub fn add(path: impl Into<String>, value: impl Into<Value>) -> Self {
        PatchOperation::Add {
            path: path.into(),
            value: value.into(),
        }
    }

    pub fn replace(path: impl Into<String>, value: impl Into<Value>) -> Self {
        PatchOperation::Replace {
            path: path.into(),
            value: value.into(),
        }
    }

    pub fn remove(path: impl Into<String>) -> Self {
        PatchOperation::Remove { path: path.into() }
    }

    /// Returns the operation name as it appears on the wire.
    pub fn op(&self) -> &'static str {
        match self {
            PatchOperation::Add { .. } => "add",
            PatchOperation::Replace { .. } => "replace",
            PatchOperation::Remove { .. } => "remove",
        }
    }

    pub fn path(&self) -> &str {
        match self {
            PatchOperation::Add { path, .. }
            | PatchOperation::Replace { path, .. }
            | PatchOperation::Remove { path } => path,
        }
    }

    pub fn value(&self) -> Option<&Value> {
        match self {
            PatchOperation::Add { value, .. } | PatchOperation::Replace { value, .. } => Some(value),
            PatchOperation::Remove { .. } => None,
        }
    }
}

impl fmt::Display for PatchOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.op(), self.path())
    }
}

/// PatchOperations is an ordered list of patch operations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PatchOperations {
    ops: Vec<PatchOperation>,
}

impl PatchOperations {
    pub fn new() -> Self {
        PatchOperations { ops: Vec::new() }
    }

    pub fn push(&mut self, op: PatchOperation) {
        self.ops.push(op);
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PatchOperation> {
        self.ops.iter()
    }

    pub fn as_slice(&self) -> &[PatchOperation] {
        &self.ops
    }

    /// Returns true if both lists hold the same operations in any order.
    pub fn equivalent(&self, other: &PatchOperations) -> bool {
        self.ops.len() == other.ops.len()
            && self.ops.iter().all(|op| other.ops.contains(op))
            && other.ops.iter().all(|op| self.ops.contains(op))
    }

    /// Serializes the operations as a JSON Patch document.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl Extend<PatchOperation> for PatchOperations {
    fn extend<I: IntoIterator<Item = PatchOperation>>(&mut self, iter: I) {
        self.ops.extend(iter);
    }
}

impl FromIterator<PatchOperation> for PatchOperations {
    fn from_iter<I: IntoIterator<Item = PatchOperation>>(iter: I) -> Self {
        PatchOperations {
            ops: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for PatchOperations {
    type Item = PatchOperation;
    type IntoIter = std::vec::IntoIter<PatchOperation>;

    fn into_iter(self) -> Self::IntoIter {
        self.ops.into_iter()
    }
}

impl From<Vec<PatchOperation>> for PatchOperations {
    fn from(ops: Vec<PatchOperation>) -> Self {
        PatchOperations { ops }
    }
}

impl fmt::Display for PatchOperations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, op) in self.ops.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", op)?;
        }
        Ok(())
    }
}
