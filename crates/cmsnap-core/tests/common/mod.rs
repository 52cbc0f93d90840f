use chrono::{TimeZone, Utc};
use cmsnap_core::{Label, Scope, Snapshot, SnapshotStamp};
use serde_json::Value;

/// Build a snapshot of scope `test/app` from a JSON object of
/// `name -> definition`.
#[allow(dead_code)]
pub fn snapshot(label: Label, second: u32, resources: Value) -> Snapshot {
    let at = Utc.with_ymd_and_hms(2026, 5, 1, 12, 0, second).unwrap();
    let definitions = resources
        .as_object()
        .expect("fixture must be a JSON object")
        .iter()
        .map(|(name, definition)| (name.clone(), definition.clone()))
        .collect::<Vec<_>>();
    Snapshot::new(
        Scope::new("test", "app").unwrap(),
        label,
        SnapshotStamp::from_instant(at),
        at,
        definitions,
    )
}

#[allow(dead_code)]
pub fn before(resources: Value) -> Snapshot {
    snapshot(Label::before(), 0, resources)
}

#[allow(dead_code)]
pub fn after(resources: Value) -> Snapshot {
    snapshot(Label::after(), 30, resources)
}
