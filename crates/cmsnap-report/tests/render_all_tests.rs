// Integration tests for rendering both report artifacts

use chrono::{TimeZone, Utc};
use cmsnap_core::diff::{ChangeKey, ChangeKind, ChangeRecord, ChangeValue, KeyPath};
use cmsnap_core::errors::SnapErrorKind;
use cmsnap_core::{Scope, SnapshotStamp};
use cmsnap_report::{render_all, ArtifactKind};
use serde_json::json;
use std::fs;
use tempfile::TempDir;

fn stamps() -> (SnapshotStamp, SnapshotStamp) {
    let before = SnapshotStamp::from_instant(Utc.with_ymd_and_hms(2026, 5, 1, 12, 0, 0).unwrap());
    let after = SnapshotStamp::from_instant(Utc.with_ymd_and_hms(2026, 5, 1, 12, 30, 0).unwrap());
    (before, after)
}

fn records() -> Vec<ChangeRecord> {
    let (before_stamp, after_stamp) = stamps();
    let record = |name: &str, key: ChangeKey, before, after, kind| ChangeRecord {
        resource_name: name.to_string(),
        key,
        before,
        after,
        kind,
        before_stamp: before_stamp.clone(),
        after_stamp: after_stamp.clone(),
    };
    vec![
        record(
            "cm1",
            ChangeKey::Path(KeyPath::root().child("data").child("LOG_LEVEL")),
            ChangeValue::Present(json!("info")),
            ChangeValue::Present(json!("debug")),
            ChangeKind::Modified,
        ),
        record(
            "cm2",
            ChangeKey::WholeResource,
            ChangeValue::Absent,
            ChangeValue::Present(json!({"data": {"k": "v"}})),
            ChangeKind::Added,
        ),
        record(
            "cm3",
            ChangeKey::WholeResource,
            ChangeValue::Present(json!({"data": {}})),
            ChangeValue::Absent,
            ChangeKind::Removed,
        ),
    ]
}

fn scope() -> Scope {
    Scope::new("prod", "billing").unwrap()
}

#[test]
fn test_render_all_writes_both_artifacts() {
    // Given: an output root and three change records
    let out = TempDir::new().unwrap();
    let (_, after_stamp) = stamps();

    // When: we render
    let outcome = render_all(out.path(), &scope(), &after_stamp, &records());

    // Then: both files exist under <out>/<profile>/<application>/
    assert!(outcome.is_complete());
    let dir = out.path().join("prod").join("billing");
    let xlsx = dir.join("prod_billing_diff_20260501-123000.xlsx");
    let pdf = dir.join("prod_billing_diff_20260501-123000.pdf");
    assert_eq!(outcome.spreadsheet.as_ref().unwrap(), &xlsx);
    assert_eq!(outcome.document.as_ref().unwrap(), &pdf);
    assert!(fs::read(&xlsx).unwrap().starts_with(b"PK"));
    assert!(fs::read(&pdf).unwrap().starts_with(b"%PDF"));
    assert_eq!(outcome.written().len(), 2);
    assert!(outcome.failures().is_empty());
}

#[test]
fn test_render_all_with_no_changes_still_writes_headers() {
    let out = TempDir::new().unwrap();
    let (_, after_stamp) = stamps();

    let outcome = render_all(out.path(), &scope(), &after_stamp, &[]);

    assert!(outcome.is_complete());
}

#[test]
fn test_one_artifact_failing_does_not_block_the_other() {
    // Given: the spreadsheet path is occupied by a directory
    let out = TempDir::new().unwrap();
    let (_, after_stamp) = stamps();
    let dir = out.path().join("prod").join("billing");
    fs::create_dir_all(dir.join("prod_billing_diff_20260501-123000.xlsx").join("blocker")).unwrap();

    // When: we render
    let outcome = render_all(out.path(), &scope(), &after_stamp, &records());

    // Then: the spreadsheet fails with an Io error and the document is written
    assert!(!outcome.is_complete());
    let failures = outcome.failures();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].0, ArtifactKind::Spreadsheet);
    assert_eq!(failures[0].1.kind(), SnapErrorKind::Io);
    assert!(outcome.document.is_ok());
    assert!(dir.join("prod_billing_diff_20260501-123000.pdf").is_file());
}

#[test]
fn test_unwritable_output_root_fails_both() {
    let out = TempDir::new().unwrap();
    let blocker = out.path().join("not-a-dir");
    fs::write(&blocker, b"x").unwrap();
    let (_, after_stamp) = stamps();

    let outcome = render_all(&blocker, &scope(), &after_stamp, &records());

    assert_eq!(outcome.failures().len(), 2);
    assert!(outcome
        .failures()
        .iter()
        .all(|(_, e)| e.kind() == SnapErrorKind::Io));
}
