mod common;

use cmsnap_core::diff::{diff, render_summary, summarize, ResourceStatus};
use common::{after, before};
use serde_json::json;
use std::collections::BTreeMap;

#[test]
fn test_summary_counts_every_status() {
    let b = before(json!({
        "same": {"k": "v"},
        "changed": {"a": 1, "b": 1},
        "gone": {"k": "v"},
        "broken": {"k": "v"}
    }));
    let a = after(json!({
        "same": {"k": "v"},
        "changed": {"a": 2, "c": 1},
        "new": {"k": "v"}
    }))
    .with_unreadable(BTreeMap::from([("broken".to_string(), "bad json".to_string())]));

    let records = diff(&b, &a);
    let summary = summarize(&b, &a, &records);

    let statuses: Vec<(&str, ResourceStatus, usize)> = summary
        .resources
        .iter()
        .map(|r| (r.name.as_str(), r.status, r.changes))
        .collect();
    assert_eq!(
        statuses,
        vec![
            ("broken", ResourceStatus::Unreadable, 1),
            ("changed", ResourceStatus::Modified, 3),
            ("gone", ResourceStatus::Removed, 1),
            ("new", ResourceStatus::Added, 1),
            ("same", ResourceStatus::Unchanged, 0),
        ]
    );
    assert_eq!(summary.count(ResourceStatus::Unchanged), 1);
    assert_eq!(summary.changed_resources(), 4);
}

#[test]
fn test_render_summary_reports_no_differences() {
    let b = before(json!({"cm1": {"k": "v"}}));
    let a = after(json!({"cm1": {"k": "v"}}));

    let summary = summarize(&b, &a, &diff(&b, &a));
    let text = render_summary(&summary);

    assert!(text.contains("ConfigMap"));
    assert!(text.contains("cm1"));
    assert!(text.contains("Unchanged"));
    assert!(text.contains("No differences found."));
}

#[test]
fn test_render_summary_reports_changed_count() {
    let b = before(json!({"cm1": {"k": "v"}}));
    let a = after(json!({"cm1": {"k": "w"}, "cm2": {}}));

    let summary = summarize(&b, &a, &diff(&b, &a));
    let text = render_summary(&summary);

    assert!(text.contains("2 of 2 ConfigMaps changed"));
    assert!(text.contains("added: 1"));
    assert!(text.contains("modified: 1"));
}
