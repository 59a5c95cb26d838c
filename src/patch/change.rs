//! Change tracking between prior and planned configuration state.

use crate::value::Value;

/// ChangeSource reports how a configuration field changed between the
/// prior state and the planned state.
///
/// Keys are dotted paths such as `metadata.0.labels`.
pub trait ChangeSource {
    /// Returns true if the field at `key` differs between the two states.
    fn has_change(&self, key: &str) -> bool;

    /// Returns the `(old, new)` values of the field at `key`. Absent
    /// fields are reported as [`Value::Null`].
    fn get_change(&self, key: &str) -> (Value, Value);
}

/// StateDiff is a [`ChangeSource`] over two complete state documents.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StateDiff {
    pub old: Value,
    pub new: Value,
}

impl StateDiff {
    pub fn new(old: Value, new: Value) -> Self {
        StateDiff { old, new }
    }
}

/// Treats missing, null and empty collections alike.
fn effective(value: Option<&Value>) -> Option<&Value> {
    value.filter(|v| match v {
        Value::Null => false,
        Value::Map(m) => !m.is_empty(),
        Value::List(l) => !l.is_empty(),
        _ => true,
    })
}

impl ChangeSource for StateDiff {
    fn has_change(&self, key: &str) -> bool {
        effective(self.old.lookup(key)) != effective(self.new.lookup(key))
    }

    fn get_change(&self, key: &str) -> (Value, Value) {
        (
            self.old.lookup(key).cloned().unwrap_or_default(),
            self.new.lookup(key).cloned().unwrap_or_default(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::from_json;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_state_diff_detects_changes() {
        let diff = StateDiff::new(
            from_json(r#"{"metadata":[{"labels":{"a":"1"},"annotations":{}}]}"#).unwrap(),
            from_json(r#"{"metadata":[{"labels":{"a":"2"}}]}"#).unwrap(),
        );

        assert!(diff.has_change("metadata.0.labels"));
        assert!(!diff.has_change("metadata.0.annotations"));
        assert!(!diff.has_change("metadata.0.missing"));
    }

    #[test]
    fn test_state_diff_get_change() {
        let diff = StateDiff::new(
            from_json(r#"{"labels":{"a":"1"}}"#).unwrap(),
            from_json(r#"{}"#).unwrap(),
        );

        let (old, new) = diff.get_change("labels");
        assert_eq!(old, from_json(r#"{"a":"1"}"#).unwrap());
        assert_eq!(new, Value::Null);
    }
}
