//! Persistent volume access modes.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeSet;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use crate::error::Result;
use crate::value::Value;

/// AccessMode describes how a volume may be mounted.
///
/// Unrecognized strings are kept verbatim as [`AccessMode::Other`] so that
/// modes added by newer API servers pass through untouched.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AccessMode {
    ReadWriteOnce,
    ReadOnlyMany,
    ReadWriteMany,
    ReadWriteOncePod,
    Other(String),
}

impl AccessMode {
    pub fn as_str(&self) -> &str {
        match self {
            AccessMode::ReadWriteOnce => "ReadWriteOnce",
            AccessMode::ReadOnlyMany => "ReadOnlyMany",
            AccessMode::ReadWriteMany => "ReadWriteMany",
            AccessMode::ReadWriteOncePod => "ReadWriteOncePod",
            AccessMode::Other(s) => s,
        }
    }
}

impl FromStr for AccessMode {
    type Err = Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match s {
            "ReadWriteOnce" => AccessMode::ReadWriteOnce,
            "ReadOnlyMany" => AccessMode::ReadOnlyMany,
            "ReadWriteMany" => AccessMode::ReadWriteMany,
            "ReadWriteOncePod" => AccessMode::ReadWriteOncePod,
            other => AccessMode::Other(other.to_string()),
        })
    }
}

impl From<&str> for AccessMode {
    fn from(s: &str) -> Self {
        match s.parse() {
            Ok(mode) => mode,
            Err(never) => match never {},
        }
    }
}

impl From<AccessMode> for String {
    fn from(mode: AccessMode) -> Self {
        match mode {
            AccessMode::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for AccessMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for AccessMode {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for AccessMode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(AccessMode::from(s.as_str()))
    }
}

/// Collects access modes into a set of their wire strings.
pub fn flatten_persistent_volume_access_modes(modes: &[AccessMode]) -> BTreeSet<String> {
    modes.iter().map(|m| m.as_str().to_string()).collect()
}

/// Reads access modes from a generic sequence, keeping the given order.
pub fn expand_persistent_volume_access_modes(s: &[Value]) -> Result<Vec<AccessMode>> {
    s.iter()
        .enumerate()
        .map(|(i, v)| v.expect_str(&format!("access_modes[{}]", i)).map(AccessMode::from))
        .collect()
}
