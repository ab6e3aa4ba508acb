//! Records held by entity containers

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A server-defined record the client can locate by identifier.
pub trait Entity: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    fn id(&self) -> Option<&str>;

    /// Fold a server-returned version of this record into `self`.
    fn merge(&mut self, incoming: Self) {
        *self = incoming;
    }
}

/// Opaque JSON record keyed by its `_id` field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(pub Value);

impl Record {
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Follow nested object fields, e.g. `["treatment", "cost"]`.
    pub fn pointer(&self, path: &[&str]) -> Option<&Value> {
        path.iter().try_fold(&self.0, |value, key| value.get(*key))
    }

    pub fn str_field(&self, field: &str) -> Option<&str> {
        self.get(field).and_then(Value::as_str)
    }

    pub fn into_inner(self) -> Value {
        self.0
    }
}

impl From<Value> for Record {
    fn from(value: Value) -> Self {
        Record(value)
    }
}

impl Entity for Record {
    fn id(&self) -> Option<&str> {
        self.str_field("_id")
    }

    /// Shallow overlay: fields from `incoming` replace fields of the same name.
    fn merge(&mut self, incoming: Self) {
        match (&mut self.0, incoming.0) {
            (Value::Object(current), Value::Object(fields)) => current.extend(fields),
            (current, other) => *current = other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_record_id() {
        assert_eq!(Record(json!({"_id": "x1"})).id(), Some("x1"));
        assert_eq!(Record(json!({"id": "x1"})).id(), None);
        assert_eq!(Record(json!({"_id": 5})).id(), None);
    }

    #[test]
    fn test_shallow_merge_keeps_unreturned_fields() {
        let mut record = Record(json!({"_id": "d1", "name": "Old", "floor": 2}));
        record.merge(Record(json!({"_id": "d1", "name": "New"})));
        assert_eq!(record.0, json!({"_id": "d1", "name": "New", "floor": 2}));
    }

    #[test]
    fn test_pointer() {
        let record = Record(json!({"treatment": {"cost": "150"}}));
        assert_eq!(record.pointer(&["treatment", "cost"]), Some(&json!("150")));
        assert_eq!(record.pointer(&["treatment", "name"]), None);
        assert_eq!(record.pointer(&[]), Some(&record.0));
    }
}
