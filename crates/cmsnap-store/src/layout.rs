//! On-disk layout of the snapshot store
//!
//! ```text
//! <root>/<profile>/<application>/<label>/<stamp>/<resource>.json
//! <root>/<profile>/<application>/<label>/<stamp>/_snapshot.json
//! <root>/<profile>/<application>/<label>/.staging-<stamp>-<pid>-<n>/
//! ```

use cmsnap_core::{Label, Scope, SnapshotStamp};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

const RESOURCE_EXTENSION: &str = "json";
const STAGING_PREFIX: &str = ".staging-";

static STAGING_SEQ: AtomicU64 = AtomicU64::new(0);

/// Directory holding every snapshot of one slot.
pub fn slot_dir(root: &Path, scope: &Scope, label: &Label) -> PathBuf {
    root.join(scope.profile())
        .join(scope.application())
        .join(label.as_str())
}

pub fn snapshot_dir(slot: &Path, stamp: &SnapshotStamp) -> PathBuf {
    slot.join(stamp.as_str())
}

/// File name a resource is stored under.
pub fn resource_file_name(name: &str) -> String {
    format!("{}.{}", name, RESOURCE_EXTENSION)
}

/// Fresh staging directory name, unique across processes and threads.
pub fn staging_dir_name(stamp: &SnapshotStamp) -> String {
    let seq = STAGING_SEQ.fetch_add(1, Ordering::Relaxed);
    format!(
        "{}{}-{}-{}",
        STAGING_PREFIX,
        stamp,
        std::process::id(),
        seq
    )
}

/// Entries starting with `.` are staging or temp files, never snapshots.
pub fn is_hidden(file_name: &str) -> bool {
    file_name.starts_with('.')
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_slot_dir_nests_scope_and_label() {
        let scope = Scope::new("prod", "billing").unwrap();
        let dir = slot_dir(Path::new("/snaps"), &scope, &Label::before());
        assert_eq!(dir, PathBuf::from("/snaps/prod/billing/before"));
    }

    #[test]
    fn test_staging_names_are_hidden_and_unique() {
        let stamp = SnapshotStamp::from_instant(Utc.with_ymd_and_hms(2026, 5, 1, 0, 0, 0).unwrap());
        let a = staging_dir_name(&stamp);
        let b = staging_dir_name(&stamp);
        assert_ne!(a, b);
        assert!(is_hidden(&a));
        assert!(a.starts_with(".staging-20260501-000000-"));
    }

    #[test]
    fn test_resource_file_name() {
        assert_eq!(resource_file_name("cm1"), "cm1.json");
    }
}
