//! Tabular view of change records shared by both renderers.

use cmsnap_core::diff::{ChangeKind, ChangeRecord};
use cmsnap_core::{Scope, SnapshotStamp};

/// Column headers, in output order.
pub const COLUMNS: [&str; 7] = [
    "ConfigMap",
    "Key",
    "Before",
    "After",
    "Status",
    "BeforeTime",
    "AfterTime",
];

/// Light grey header fill.
pub const HEADER_FILL: u32 = 0xD3D3D3;

/// Row fill for a change category (RGB).
pub fn category_fill(kind: ChangeKind) -> u32 {
    match kind {
        ChangeKind::Added => 0xC6EFCE,
        ChangeKind::Removed => 0xFFC7CE,
        ChangeKind::Modified => 0xFFEB9C,
    }
}

/// One output row: the seven cells plus the category that colours it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRow {
    pub cells: [String; 7],
    pub kind: ChangeKind,
}

impl ReportRow {
    pub fn from_record(record: &ChangeRecord) -> Self {
        Self {
            cells: [
                record.resource_name.clone(),
                record.key.to_string(),
                record.before.display_text(),
                record.after.display_text(),
                record.kind.as_str().to_string(),
                record.before_stamp.to_string(),
                record.after_stamp.to_string(),
            ],
            kind: record.kind,
        }
    }
}

/// Rows in the order the differ produced the records.
pub fn rows_from_records(records: &[ChangeRecord]) -> Vec<ReportRow> {
    records.iter().map(ReportRow::from_record).collect()
}

/// `<profile>_<application>_diff_<after-stamp>`, the shared artifact stem.
pub fn artifact_stem(scope: &Scope, after_stamp: &SnapshotStamp) -> String {
    format!(
        "{}_{}_diff_{}",
        scope.profile(),
        scope.application(),
        after_stamp
    )
}
