//! Per-resource roll-up of a diff, including resources that did not change.

use crate::diff::model::{ChangeKey, ChangeKind, ChangeRecord, ChangeValue};
use crate::model::Snapshot;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Overall status of one resource between two snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ResourceStatus {
    Added,
    Removed,
    Modified,
    Unchanged,
    Unreadable,
}

impl ResourceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceStatus::Added => "Added",
            ResourceStatus::Removed => "Removed",
            ResourceStatus::Modified => "Modified",
            ResourceStatus::Unchanged => "Unchanged",
            ResourceStatus::Unreadable => "Unreadable",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceSummary {
    pub name: String,
    pub status: ResourceStatus,
    /// Number of change records for this resource.
    pub changes: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiffSummary {
    /// One entry per resource name in either snapshot, ascending by name.
    pub resources: Vec<ResourceSummary>,
    pub totals: BTreeMap<ResourceStatus, usize>,
}

impl DiffSummary {
    pub fn count(&self, status: ResourceStatus) -> usize {
        self.totals.get(&status).copied().unwrap_or(0)
    }

    /// Resources that are not `Unchanged`.
    pub fn changed_resources(&self) -> usize {
        self.resources
            .iter()
            .filter(|r| r.status != ResourceStatus::Unchanged)
            .count()
    }
}

fn status_of(records: &[&ChangeRecord]) -> ResourceStatus {
    let unreadable = records.iter().any(|r| {
        matches!(r.before, ChangeValue::Unreadable(_)) || matches!(r.after, ChangeValue::Unreadable(_))
    });
    if unreadable {
        return ResourceStatus::Unreadable;
    }
    match records {
        [] => ResourceStatus::Unchanged,
        [only] if only.key == ChangeKey::WholeResource && only.kind == ChangeKind::Added => {
            ResourceStatus::Added
        }
        [only] if only.key == ChangeKey::WholeResource && only.kind == ChangeKind::Removed => {
            ResourceStatus::Removed
        }
        _ => ResourceStatus::Modified,
    }
}

/// Roll the records of one diff up per resource.
///
/// Resources present in both snapshots without records are `Unchanged`.
pub fn summarize(before: &Snapshot, after: &Snapshot, records: &[ChangeRecord]) -> DiffSummary {
    let mut by_name: BTreeMap<&str, Vec<&ChangeRecord>> = before
        .names()
        .chain(after.names())
        .collect::<BTreeSet<&str>>()
        .into_iter()
        .map(|name| (name, Vec::new()))
        .collect();
    for record in records {
        by_name
            .entry(record.resource_name.as_str())
            .or_default()
            .push(record);
    }

    let mut totals = BTreeMap::new();
    let resources = by_name
        .into_iter()
        .map(|(name, records)| {
            let status = status_of(&records);
            *totals.entry(status).or_insert(0) += 1;
            ResourceSummary {
                name: name.to_string(),
                status,
                changes: records.len(),
            }
        })
        .collect();

    DiffSummary { resources, totals }
}

/// Render a plain-text table of the summary for terminal output.
pub fn render_summary(summary: &DiffSummary) -> String {
    let name_width = summary
        .resources
        .iter()
        .map(|r| r.name.len())
        .chain(std::iter::once("ConfigMap".len()))
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    out.push_str(&format!(
        "{:<name_width$}  {:<10}  {}\n",
        "ConfigMap", "Status", "Changes"
    ));
    out.push_str(&format!(
        "{}  {}  {}\n",
        "-".repeat(name_width),
        "-".repeat(10),
        "-".repeat(7)
    ));
    for resource in &summary.resources {
        let changes = if resource.changes == 0 {
            "-".to_string()
        } else {
            resource.changes.to_string()
        };
        out.push_str(&format!(
            "{:<name_width$}  {:<10}  {}\n",
            resource.name,
            resource.status.as_str(),
            changes
        ));
    }

    out.push('\n');
    let changed = summary.changed_resources();
    if changed == 0 {
        out.push_str("No differences found.\n");
    } else {
        out.push_str(&format!(
            "{} of {} ConfigMaps changed (added: {}, removed: {}, modified: {}, unreadable: {}).\n",
            changed,
            summary.resources.len(),
            summary.count(ResourceStatus::Added),
            summary.count(ResourceStatus::Removed),
            summary.count(ResourceStatus::Modified),
            summary.count(ResourceStatus::Unreadable),
        ));
    }
    out
}
