//! Snapshot diff computation engine.
//!
//! The entry points are [`diff`] and [`diff_with_options`], which compare
//! two snapshots and return their differences as an ordered list of
//! [`ChangeRecord`]s.

use crate::diff::model::{ChangeKey, ChangeKind, ChangeRecord, ChangeValue, DiffOptions, KeyPath};
use crate::model::{Snapshot, SnapshotStamp};
use serde_json::Value;
use std::collections::BTreeSet;

/// How one snapshot holds a given resource name.
#[derive(Debug, Clone, Copy)]
enum Side<'a> {
    Missing,
    Unreadable(&'a str),
    Definition(&'a Value),
}

fn side<'a>(snapshot: &'a Snapshot, name: &str) -> Side<'a> {
    if let Some(reason) = snapshot.unreadable().get(name) {
        return Side::Unreadable(reason);
    }
    match snapshot.get(name) {
        None => Side::Missing,
        Some(resource) if resource.definition.is_null() => Side::Missing,
        Some(resource) => Side::Definition(&resource.definition),
    }
}

/// Order-insensitive canonical text of a value.
///
/// Object keys are emitted sorted and sequence elements are sorted by their
/// own canonical text, so two values have the same canonical text exactly
/// when they are deep-equal with sequence order ignored.
fn canonical_text(value: &Value) -> String {
    match value {
        Value::Array(items) => {
            let mut parts: Vec<String> = items.iter().map(canonical_text).collect();
            parts.sort();
            format!("[{}]", parts.join(","))
        }
        Value::Object(map) => {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            let parts: Vec<String> = entries
                .into_iter()
                .map(|(key, value)| {
                    format!("{}:{}", Value::String(key.clone()), canonical_text(value))
                })
                .collect();
            format!("{{{}}}", parts.join(","))
        }
        scalar => scalar.to_string(),
    }
}

/// Deep equality that ignores the order of sequence elements.
pub fn equivalent(a: &Value, b: &Value) -> bool {
    a == b || canonical_text(a) == canonical_text(b)
}

/// Collects the records of a single resource.
struct ResourceDiff<'a> {
    name: &'a str,
    before_stamp: &'a SnapshotStamp,
    after_stamp: &'a SnapshotStamp,
    options: &'a DiffOptions,
    records: Vec<ChangeRecord>,
}

impl ResourceDiff<'_> {
    fn push(&mut self, kind: ChangeKind, key: ChangeKey, before: ChangeValue, after: ChangeValue) {
        self.records.push(ChangeRecord {
            resource_name: self.name.to_string(),
            key,
            before,
            after,
            kind,
            before_stamp: self.before_stamp.clone(),
            after_stamp: self.after_stamp.clone(),
        });
    }

    fn compare_sides(&mut self, before: Side<'_>, after: Side<'_>) {
        match (before, after) {
            (Side::Missing, Side::Missing) => {}
            (Side::Definition(b), Side::Missing) => self.push(
                ChangeKind::Removed,
                ChangeKey::WholeResource,
                ChangeValue::Present(b.clone()),
                ChangeValue::Absent,
            ),
            (Side::Missing, Side::Definition(a)) => self.push(
                ChangeKind::Added,
                ChangeKey::WholeResource,
                ChangeValue::Absent,
                ChangeValue::Present(a.clone()),
            ),
            (Side::Definition(b), Side::Definition(a)) => {
                if b.is_object() && a.is_object() {
                    self.compare_values(&KeyPath::root(), b, a);
                } else if !equivalent(b, a) {
                    // Non-mapping definitions are only compared as a whole.
                    self.push(
                        ChangeKind::Modified,
                        ChangeKey::WholeResource,
                        ChangeValue::Present(b.clone()),
                        ChangeValue::Present(a.clone()),
                    );
                }
            }
            (Side::Unreadable(b), Side::Unreadable(a)) => self.push(
                ChangeKind::Modified,
                ChangeKey::WholeResource,
                ChangeValue::Unreadable(b.to_string()),
                ChangeValue::Unreadable(a.to_string()),
            ),
            (Side::Unreadable(reason), other) => {
                let after = match other {
                    Side::Definition(a) => ChangeValue::Present(a.clone()),
                    _ => ChangeValue::Absent,
                };
                self.push(
                    ChangeKind::Modified,
                    ChangeKey::WholeResource,
                    ChangeValue::Unreadable(reason.to_string()),
                    after,
                );
            }
            (other, Side::Unreadable(reason)) => {
                let before = match other {
                    Side::Definition(b) => ChangeValue::Present(b.clone()),
                    _ => ChangeValue::Absent,
                };
                self.push(
                    ChangeKind::Modified,
                    ChangeKey::WholeResource,
                    before,
                    ChangeValue::Unreadable(reason.to_string()),
                );
            }
        }
    }

    fn compare_values(&mut self, path: &KeyPath, before: &Value, after: &Value) {
        if self.options.is_ignored(path) {
            return;
        }
        match (before, after) {
            (Value::Object(b), Value::Object(a)) => {
                let keys: BTreeSet<&String> = b.keys().chain(a.keys()).collect();
                for key in keys {
                    let child = path.child(key.as_str());
                    if self.options.is_ignored(&child) {
                        continue;
                    }
                    match (b.get(key), a.get(key)) {
                        (Some(bv), None) => self.push(
                            ChangeKind::Removed,
                            ChangeKey::Path(child),
                            ChangeValue::Present(bv.clone()),
                            ChangeValue::Absent,
                        ),
                        (None, Some(av)) => self.push(
                            ChangeKind::Added,
                            ChangeKey::Path(child),
                            ChangeValue::Absent,
                            ChangeValue::Present(av.clone()),
                        ),
                        (Some(bv), Some(av)) => self.compare_values(&child, bv, av),
                        (None, None) => {}
                    }
                }
            }
            // Sequences, scalars and type mismatches are leaves.
            (b, a) => {
                if !equivalent(b, a) {
                    self.push(
                        ChangeKind::Modified,
                        ChangeKey::Path(path.clone()),
                        ChangeValue::Present(b.clone()),
                        ChangeValue::Present(a.clone()),
                    );
                }
            }
        }
    }
}

/// Compare two snapshots with default options.
pub fn diff(before: &Snapshot, after: &Snapshot) -> Vec<ChangeRecord> {
    diff_with_options(before, after, &DiffOptions::default())
}

/// Compare two snapshots and classify every difference.
///
/// Records are grouped by resource name (ascending). Within a resource,
/// Added records come first, then Removed, then Modified; within one kind
/// records follow traversal order (mapping keys ascending, depth first).
/// Neither snapshot is modified and the result depends only on the inputs.
pub fn diff_with_options(
    before: &Snapshot,
    after: &Snapshot,
    options: &DiffOptions,
) -> Vec<ChangeRecord> {
    let names: BTreeSet<&str> = before.names().chain(after.names()).collect();

    let mut records = Vec::new();
    for name in names {
        let mut resource = ResourceDiff {
            name,
            before_stamp: before.stamp(),
            after_stamp: after.stamp(),
            options,
            records: Vec::new(),
        };
        resource.compare_sides(side(before, name), side(after, name));
        resource.records.sort_by_key(|record| record.kind);
        records.extend(resource.records);
    }
    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_equivalent_ignores_sequence_order() {
        assert!(equivalent(&json!([1, 2, 3]), &json!([3, 1, 2])));
        assert!(equivalent(
            &json!([{"a": [1, 2]}, "x"]),
            &json!(["x", {"a": [2, 1]}])
        ));
    }

    #[test]
    fn test_equivalent_respects_multiplicity() {
        assert!(!equivalent(&json!([1, 1, 2]), &json!([1, 2, 2])));
        assert!(!equivalent(&json!([1, 2]), &json!([1, 2, 2])));
    }

    #[test]
    fn test_equivalent_distinguishes_types() {
        assert!(!equivalent(&json!("1"), &json!(1)));
        assert!(!equivalent(&json!({}), &json!([])));
        assert!(!equivalent(&json!(null), &json!({})));
    }

    #[test]
    fn test_canonical_text_quotes_keys() {
        assert_eq!(canonical_text(&json!({"b": 1, "a": [2, 1]})), r#"{"a":[1,2],"b":1}"#);
    }
}
