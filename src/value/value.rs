//! Core value types and typed accessors.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{Error, Result};

/// Value represents one untyped configuration value, as handed over by the
/// host tool's resource schema.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    List(Vec<Value>),
    Map(Map),
}

/// Map represents a configuration block: string keys to generic values.
///
/// Keys iterate in sorted order, which keeps every conversion built on top
/// of it deterministic.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Map {
    pub fields: BTreeMap<String, Value>,
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn is_string(&self) -> bool {
        matches!(self, Value::String(_))
    }

    pub fn is_map(&self) -> bool {
        matches!(self, Value::Map(_))
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&Vec<Value>> {
        match self {
            Value::List(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&Map> {
        match self {
            Value::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Returns the name of the variant, used in type mismatch errors.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::List(_) => "list",
            Value::Map(_) => "map",
        }
    }

    /// Returns the string, or a type mismatch error naming `field`.
    pub fn expect_str(&self, field: &str) -> Result<&str> {
        self.as_str()
            .ok_or_else(|| Error::type_mismatch(field, "string", self.type_name()))
    }

    /// Returns the map, or a type mismatch error naming `field`.
    pub fn expect_map(&self, field: &str) -> Result<&Map> {
        self.as_map()
            .ok_or_else(|| Error::type_mismatch(field, "map", self.type_name()))
    }

    /// Returns the list, or a type mismatch error naming `field`.
    pub fn expect_list(&self, field: &str) -> Result<&[Value]> {
        self.as_list()
            .map(Vec::as_slice)
            .ok_or_else(|| Error::type_mismatch(field, "list", self.type_name()))
    }

    /// Resolves a dotted path such as `metadata.0.labels`.
    ///
    /// Map segments are looked up by key, list segments by index. Any
    /// segment that cannot be followed resolves to `None`.
    pub fn lookup(&self, path: &str) -> Option<&Value> {
        if path.is_empty() {
            return Some(self);
        }
        let mut current = self;
        for segment in path.split('.') {
            current = match current {
                Value::Map(m) => m.get(segment)?,
                Value::List(l) => l.get(segment.parse::<usize>().ok()?)?,
                _ => return None,
            };
        }
        Some(current)
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a.to_bits() == b.to_bits(),
            (Value::String(a), Value::String(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<Map> for Value {
    fn from(m: Map) -> Self {
        Value::Map(m)
    }
}

impl From<Vec<Value>> for Value {
    fn from(l: Vec<Value>) -> Self {
        Value::List(l)
    }
}

impl From<BTreeMap<String, String>> for Value {
    fn from(m: BTreeMap<String, String>) -> Self {
        Value::Map(Map::from(m))
    }
}

impl Map {
    pub fn new() -> Self {
        Map {
            fields: BTreeMap::new(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(key.into(), value.into());
    }

    pub fn has(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn delete(&mut self, key: &str) -> Option<Value> {
        self.fields.remove(key)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.fields.iter()
    }

    /// Returns a present value, treating explicit nulls as absent.
    fn present(&self, key: &str) -> Option<&Value> {
        self.fields.get(key).filter(|v| !v.is_null())
    }

    pub fn get_str(&self, key: &str) -> Result<Option<&str>> {
        self.present(key).map(|v| v.expect_str(key)).transpose()
    }

    pub fn get_bool(&self, key: &str) -> Result<Option<bool>> {
        self.present(key)
            .map(|v| {
                v.as_bool()
                    .ok_or_else(|| Error::type_mismatch(key, "bool", v.type_name()))
            })
            .transpose()
    }

    pub fn get_int(&self, key: &str) -> Result<Option<i64>> {
        self.present(key)
            .map(|v| {
                v.as_int()
                    .ok_or_else(|| Error::type_mismatch(key, "int", v.type_name()))
            })
            .transpose()
    }

    pub fn get_map(&self, key: &str) -> Result<Option<&Map>> {
        self.present(key).map(|v| v.expect_map(key)).transpose()
    }

    pub fn get_list(&self, key: &str) -> Result<Option<&[Value]>> {
        self.present(key).map(|v| v.expect_list(key)).transpose()
    }
}

impl From<BTreeMap<String, String>> for Map {
    fn from(m: BTreeMap<String, String>) -> Self {
        Map {
            fields: m.into_iter().map(|(k, v)| (k, Value::String(v))).collect(),
        }
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Map {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Map {
            fields: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

/// Parse a value from JSON.
pub fn from_json(json: &str) -> std::result::Result<Value, serde_json::Error> {
    serde_json::from_str(json)
}

/// Serialize a value to JSON.
pub fn to_json(value: &Value) -> std::result::Result<String, serde_json::Error> {
    serde_json::to_string(value)
}

/// Parse a value from YAML.
pub fn from_yaml(yaml: &str) -> std::result::Result<Value, serde_yaml::Error> {
    serde_yaml::from_str(yaml)
}

/// Serialize a value to YAML.
pub fn to_yaml(value: &Value) -> std::result::Result<String, serde_yaml::Error> {
    serde_yaml::to_string(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_map_operations() {
        let mut map = Map::new();
        assert!(map.is_empty());

        map.set("key", "value");
        assert!(!map.is_empty());
        assert!(map.has("key"));
        assert_eq!(map.get("key"), Some(&Value::String("value".into())));

        map.delete("key");
        assert!(!map.has("key"));
    }

    #[test]
    fn test_typed_accessors() {
        let mut map = Map::new();
        map.set("name", "web");
        map.set("replicas", 3i64);
        map.set("enabled", true);
        map.set("gone", Value::Null);

        assert_eq!(map.get_str("name").unwrap(), Some("web"));
        assert_eq!(map.get_int("replicas").unwrap(), Some(3));
        assert_eq!(map.get_bool("enabled").unwrap(), Some(true));
        assert_eq!(map.get_str("missing").unwrap(), None);
        assert_eq!(map.get_str("gone").unwrap(), None);
    }

    #[test]
    fn test_typed_accessor_mismatch() {
        let mut map = Map::new();
        map.set("name", 42i64);

        let err = map.get_str("name").unwrap_err();
        assert_eq!(err, Error::type_mismatch("name", "string", "int"));

        let err = map.get_bool("name").unwrap_err();
        assert_eq!(err, Error::type_mismatch("name", "bool", "int"));

        assert!(map.get_map("name").is_err());
        assert!(map.get_list("name").is_err());
    }

    #[test]
    fn test_lookup() {
        let value = from_json(r#"{"metadata":[{"labels":{"app":"web"}}]}"#).unwrap();

        assert_eq!(
            value.lookup("metadata.0.labels.app"),
            Some(&Value::String("web".into()))
        );
        assert!(value.lookup("metadata.0.annotations").is_none());
        assert!(value.lookup("metadata.1").is_none());
        assert!(value.lookup("metadata.x").is_none());
        assert_eq!(value.lookup(""), Some(&value));
    }

    #[test]
    fn test_json_and_yaml_parsing() {
        let json = from_json(r#"{"name":"test","count":42,"tags":["a"]}"#).unwrap();
        let yaml = from_yaml("name: test\ncount: 42\ntags:\n  - a\n").unwrap();
        assert_eq!(json, yaml);

        let map = json.as_map().unwrap();
        assert_eq!(map.get("count"), Some(&Value::Int(42)));
        assert_eq!(map.get_list("tags").unwrap().map(|l| l.len()), Some(1));
    }
}
