//! Entity container state and its transitions.
//!
//! Every operation moves the container through the same machine:
//! `idle -> pending -> fulfilled | rejected`. The `apply_*` functions are the
//! fulfilled transitions; they are pure so they can be tested without a
//! transport.

use crate::entity::Entity;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Request lifecycle flags shared by every container.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lifecycle {
    pub loading: bool,
    pub error: Option<String>,
    pub success: bool,
}

impl Lifecycle {
    pub fn begin(&mut self) {
        self.loading = true;
        self.error = None;
    }

    pub fn fulfill(&mut self, mutation: bool) {
        self.loading = false;
        if mutation {
            self.success = true;
        }
    }

    pub fn reject(&mut self, message: impl Into<String>) {
        self.loading = false;
        self.error = Some(message.into());
    }

    /// Caller-driven reset, typically after a form has shown its result.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// How `update` folds the server's record into an existing list entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MergeStrategy {
    #[default]
    Replace,
    Merge,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    List,
    Create,
    Update,
    Remove,
    Detail,
    DetailUser,
    Enum,
}

impl Operation {
    /// Whether a token rejection on this operation ends the session.
    /// Detail lookups report not-found and auth failures locally only.
    pub fn invalidates_session(self) -> bool {
        !matches!(self, Operation::Detail | Operation::DetailUser)
    }

    pub fn is_mutation(self) -> bool {
        matches!(
            self,
            Operation::Create | Operation::Update | Operation::Remove
        )
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::List => "list",
            Operation::Create => "create",
            Operation::Update => "update",
            Operation::Remove => "remove",
            Operation::Detail => "detail",
            Operation::DetailUser => "detail-user",
            Operation::Enum => "enum",
        };
        f.write_str(name)
    }
}

/// State for one domain entity type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound = "R: Entity")]
pub struct EntityContainer<R> {
    pub records: Vec<R>,
    pub detail: Option<R>,
    pub user_detail: Option<R>,
    pub enums: BTreeMap<String, Vec<Value>>,
    #[serde(flatten)]
    pub status: Lifecycle,
}

impl<R> Default for EntityContainer<R> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            detail: None,
            user_detail: None,
            enums: BTreeMap::new(),
            status: Lifecycle::default(),
        }
    }
}

impl<R: Entity> EntityContainer<R> {
    pub fn enum_values(&self, field: &str) -> &[Value] {
        self.enums.get(field).map(Vec::as_slice).unwrap_or_default()
    }

    /// Replace the list wholesale, keeping server order.
    pub fn apply_list(&mut self, records: Vec<R>) {
        self.status.fulfill(false);
        self.records = records;
    }

    pub fn apply_create(&mut self, record: R) {
        self.status.fulfill(true);
        self.records.push(record);
    }

    /// Replace the matching entry in place and set `detail`.
    ///
    /// A record whose id is not in the list only lands in `detail`.
    pub fn apply_update(&mut self, record: R, strategy: MergeStrategy) {
        self.status.fulfill(true);
        let id = record.id().map(str::to_owned);
        if let Some(existing) = id
            .as_deref()
            .and_then(|id| self.records.iter_mut().find(|r| r.id() == Some(id)))
        {
            match strategy {
                MergeStrategy::Replace => *existing = record.clone(),
                MergeStrategy::Merge => existing.merge(record.clone()),
            }
        }
        self.detail = Some(record);
    }

    /// Remove at most one entry; an absent id leaves the list untouched.
    pub fn apply_remove(&mut self, id: &str) {
        self.status.fulfill(true);
        if let Some(pos) = self.records.iter().position(|r| r.id() == Some(id)) {
            self.records.remove(pos);
        }
    }

    pub fn apply_detail(&mut self, record: R) {
        self.status.fulfill(false);
        self.detail = Some(record);
    }

    pub fn apply_user_detail(&mut self, record: R) {
        self.status.fulfill(false);
        self.user_detail = Some(record);
    }

    pub fn apply_enum(&mut self, field: &str, values: Vec<Value>) {
        self.status.fulfill(false);
        self.enums.insert(field.to_string(), values);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::Record;
    use serde_json::json;

    fn rec(value: Value) -> Record {
        Record(value)
    }

    fn container_with(records: Vec<Value>) -> EntityContainer<Record> {
        EntityContainer {
            records: records.into_iter().map(Record).collect(),
            ..EntityContainer::default()
        }
    }

    #[test]
    fn test_begin_clears_error_and_keeps_success() {
        let mut status = Lifecycle {
            loading: false,
            error: Some("boom".to_string()),
            success: true,
        };
        status.begin();
        assert!(status.loading);
        assert_eq!(status.error, None);
        assert!(status.success);

        status.reject("again");
        assert!(!status.loading);
        assert_eq!(status.error.as_deref(), Some("again"));

        status.reset();
        assert_eq!(status, Lifecycle::default());
    }

    #[test]
    fn test_list_replaces_wholesale_in_order() {
        let mut c = container_with(vec![json!({"_id": "old"})]);
        c.status.begin();
        c.apply_list(vec![rec(json!({"_id": "b"})), rec(json!({"_id": "a"}))]);
        let ids: Vec<_> = c.records.iter().filter_map(|r| r.id()).collect();
        assert_eq!(ids, vec!["b", "a"]);
        assert!(!c.status.loading);
        assert!(!c.status.success);
    }

    #[test]
    fn test_create_appends() {
        let mut c = container_with(vec![json!({"_id": "a"}), json!({"_id": "b"})]);
        c.apply_create(rec(json!({"_id": "x"})));
        let ids: Vec<_> = c.records.iter().filter_map(|r| r.id()).collect();
        assert_eq!(ids, vec!["a", "b", "x"]);
        assert!(c.status.success);
    }

    #[test]
    fn test_update_replaces_matching_entry_only() {
        let mut c = container_with(vec![
            json!({"_id": "a", "n": 1}),
            json!({"_id": "b", "n": 2}),
        ]);
        c.apply_update(rec(json!({"_id": "b", "n": 20})), MergeStrategy::Replace);
        assert_eq!(c.records[0].0, json!({"_id": "a", "n": 1}));
        assert_eq!(c.records[1].0, json!({"_id": "b", "n": 20}));
        assert_eq!(c.detail, Some(rec(json!({"_id": "b", "n": 20}))));
    }

    #[test]
    fn test_update_of_absent_id_only_sets_detail() {
        let mut c = container_with(vec![json!({"_id": "a"})]);
        c.apply_update(rec(json!({"_id": "zzz"})), MergeStrategy::Replace);
        assert_eq!(c.records.len(), 1);
        assert_eq!(c.records[0].id(), Some("a"));
        assert_eq!(c.detail.as_ref().and_then(|d| d.id()), Some("zzz"));
    }

    #[test]
    fn test_update_with_merge_strategy() {
        let mut c = container_with(vec![json!({"_id": "a", "name": "A", "floor": 1})]);
        c.apply_update(rec(json!({"_id": "a", "name": "B"})), MergeStrategy::Merge);
        assert_eq!(c.records[0].0, json!({"_id": "a", "name": "B", "floor": 1}));
        assert_eq!(c.detail, Some(rec(json!({"_id": "a", "name": "B"}))));
    }

    #[test]
    fn test_remove_at_most_one() {
        let mut c = container_with(vec![
            json!({"_id": "a"}),
            json!({"_id": "b"}),
            json!({"_id": "c"}),
        ]);
        c.apply_remove("b");
        let ids: Vec<_> = c.records.iter().filter_map(|r| r.id()).collect();
        assert_eq!(ids, vec!["a", "c"]);

        c.apply_remove("missing");
        assert_eq!(c.records.len(), 2);
        assert!(c.status.success);
    }

    #[test]
    fn test_enum_slots() {
        let mut c = EntityContainer::<Record>::default();
        c.apply_enum("gender", vec![json!("Male"), json!("Female")]);
        assert_eq!(c.enum_values("gender").len(), 2);
        assert!(c.enum_values("status").is_empty());
    }

    #[test]
    fn test_operation_policy() {
        assert!(!Operation::Detail.invalidates_session());
        assert!(!Operation::DetailUser.invalidates_session());
        assert!(Operation::List.invalidates_session());
        assert!(Operation::Enum.invalidates_session());
        assert!(Operation::Remove.is_mutation());
        assert!(!Operation::Enum.is_mutation());
    }
}
