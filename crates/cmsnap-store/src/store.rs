//! Filesystem snapshot store.
//!
//! Snapshots are immutable once committed. A capture is written into a hidden
//! staging directory and published by renaming that directory to its final
//! stamp, so `latest` and `list` only ever observe complete snapshots.

#![allow(clippy::result_large_err)]

use crate::errors::{corrupt_data, io_error, serialization_error, snapshot_not_found, Result};
use crate::fs::atomic_write;
use crate::layout;
use chrono::{DateTime, Utc};
use cmsnap_core::errors::SnapErrorKind;
use cmsnap_core::model::validate_resource_name;
use cmsnap_core::snapshot::{
    compute_content_digest, ManifestEntry, SnapshotManifest, MANIFEST_FILE_NAME,
};
use cmsnap_core::{log_op_end, log_op_error, log_op_start};
use cmsnap_core::{Label, Scope, Snapshot, SnapshotStamp};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

const MAX_STAMP_SUFFIX: u32 = cmsnap_core::model::snapshot::MAX_STAMP_SUFFIX;

/// Reference to one committed snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotHandle {
    scope: Scope,
    label: Label,
    stamp: SnapshotStamp,
    dir: PathBuf,
}

impl SnapshotHandle {
    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    pub fn label(&self) -> &Label {
        &self.label
    }

    pub fn stamp(&self) -> &SnapshotStamp {
        &self.stamp
    }

    /// Directory the snapshot is stored in.
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

/// How `load` treats a resource file that cannot be read back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoadMode {
    Strict,
    Tolerant,
}

/// Snapshot store rooted at a directory.
///
/// Holds no lock across calls. Concurrent captures of one slot only race on
/// the final directory rename; the loser moves on to the next stamp suffix.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    root: PathBuf,
}

impl SnapshotStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Persist `resources` as a new snapshot taken now.
    ///
    /// # Errors
    ///
    /// - `InvalidInput` if a resource name cannot be stored
    /// - `Io` if the store location is unwritable
    /// - `Serialization` if a definition cannot be encoded
    pub fn capture(
        &self,
        scope: &Scope,
        label: &Label,
        resources: BTreeMap<String, Value>,
    ) -> Result<SnapshotHandle> {
        self.capture_at(scope, label, resources, Utc::now())
    }

    /// Persist `resources` as a new snapshot taken at `captured_at`.
    ///
    /// Never overwrites an existing snapshot: if the second is already taken
    /// the stamp gets the next free `-NN` suffix.
    ///
    /// # Errors
    ///
    /// See [`SnapshotStore::capture`]. Also `Internal` when all suffixes of
    /// the second are taken.
    pub fn capture_at(
        &self,
        scope: &Scope,
        label: &Label,
        resources: BTreeMap<String, Value>,
        captured_at: DateTime<Utc>,
    ) -> Result<SnapshotHandle> {
        let start = Instant::now();
        log_op_start!(
            "capture",
            profile = scope.profile(),
            application = scope.application(),
            label = label.as_str(),
            resource_count = resources.len()
        );

        let result = self.capture_inner(scope, label, &resources, captured_at);
        let duration_ms = start.elapsed().as_millis() as u64;
        match &result {
            Ok(handle) => {
                log_op_end!(
                    "capture",
                    duration_ms = duration_ms,
                    stamp = handle.stamp.as_str(),
                    resource_count = resources.len()
                );
            }
            Err(err) => log_op_error!("capture", err, duration_ms = duration_ms),
        }
        result
    }

    fn capture_inner(
        &self,
        scope: &Scope,
        label: &Label,
        resources: &BTreeMap<String, Value>,
        captured_at: DateTime<Utc>,
    ) -> Result<SnapshotHandle> {
        for name in resources.keys() {
            validate_resource_name(name).map_err(|e| e.with_resource(name.clone()))?;
        }

        let slot = layout::slot_dir(&self.root, scope, label);
        fs::create_dir_all(&slot).map_err(|e| io_error("create_slot_dir", &slot, e))?;

        let base = SnapshotStamp::from_instant(captured_at);
        let staging = slot.join(layout::staging_dir_name(&base));
        fs::create_dir(&staging).map_err(|e| io_error("create_staging_dir", &staging, e))?;

        let result = write_resources(&staging, resources).and_then(|entries| {
            commit_staging(&slot, &staging, scope, label, &base, captured_at, entries)
        });
        if result.is_err() {
            let _ = fs::remove_dir_all(&staging);
        }
        result
    }

    /// All committed snapshots of the slot, oldest first.
    ///
    /// An empty slot (or one never captured) yields an empty list.
    ///
    /// # Errors
    ///
    /// `Io` if the slot directory exists but cannot be read.
    pub fn list(&self, scope: &Scope, label: &Label) -> Result<Vec<SnapshotHandle>> {
        let slot = layout::slot_dir(&self.root, scope, label);
        let entries = match fs::read_dir(&slot) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(io_error("list_snapshots", &slot, e)),
        };

        let mut handles = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| io_error("list_snapshots", &slot, e))?;
            let file_name = entry.file_name();
            let Some(file_name) = file_name.to_str() else {
                continue;
            };
            if layout::is_hidden(file_name) || !entry.path().is_dir() {
                continue;
            }
            match SnapshotStamp::parse(file_name) {
                Ok(stamp) => handles.push(SnapshotHandle {
                    scope: scope.clone(),
                    label: label.clone(),
                    stamp,
                    dir: entry.path(),
                }),
                Err(_) => tracing::debug!(entry = file_name, "Skipping non-snapshot entry"),
            }
        }
        handles.sort_by(|a, b| a.stamp.cmp(&b.stamp));
        Ok(handles)
    }

    /// Most recently captured snapshot of the slot.
    ///
    /// # Errors
    ///
    /// `NotFound` if the label was never captured for this scope.
    pub fn latest(&self, scope: &Scope, label: &Label) -> Result<SnapshotHandle> {
        self.list(scope, label)?
            .pop()
            .ok_or_else(|| snapshot_not_found(scope, label))
    }

    /// Load a snapshot, failing if any stored resource is damaged.
    ///
    /// # Errors
    ///
    /// `CorruptData` if the manifest or any resource file is missing,
    /// unparseable or fails its digest check; `Io` on other read failures.
    pub fn load(&self, handle: &SnapshotHandle) -> Result<Snapshot> {
        self.load_with("load", handle, LoadMode::Strict)
    }

    /// Load a snapshot, recording damaged resources as unreadable.
    ///
    /// # Errors
    ///
    /// `CorruptData` if the manifest itself is missing or invalid; `Io` on
    /// read failures other than a missing resource file.
    pub fn load_tolerant(&self, handle: &SnapshotHandle) -> Result<Snapshot> {
        self.load_with("load_tolerant", handle, LoadMode::Tolerant)
    }

    fn load_with(&self, op: &str, handle: &SnapshotHandle, mode: LoadMode) -> Result<Snapshot> {
        let start = Instant::now();
        log_op_start!(
            op,
            profile = handle.scope.profile(),
            application = handle.scope.application(),
            label = handle.label.as_str(),
            stamp = handle.stamp.as_str()
        );

        let result = load_snapshot(handle, mode);
        let duration_ms = start.elapsed().as_millis() as u64;
        match &result {
            Ok(snapshot) => {
                log_op_end!(
                    op,
                    duration_ms = duration_ms,
                    resource_count = snapshot.len(),
                    unreadable_count = snapshot.unreadable().len()
                );
            }
            Err(err) => log_op_error!(op, err, duration_ms = duration_ms),
        }
        result
    }
}

fn write_resources(
    staging: &Path,
    resources: &BTreeMap<String, Value>,
) -> Result<BTreeMap<String, ManifestEntry>> {
    let mut entries = BTreeMap::new();
    for (name, definition) in resources {
        let bytes = serde_json::to_vec_pretty(definition)
            .map_err(|e| serialization_error("encode_resource", e).with_resource(name.clone()))?;
        let file = layout::resource_file_name(name);
        atomic_write(&staging.join(&file), &bytes)?;
        entries.insert(
            name.clone(),
            ManifestEntry {
                file,
                digest: compute_content_digest(&bytes),
                size_bytes: bytes.len() as u64,
            },
        );
    }
    Ok(entries)
}

/// Publish the staging directory under the first free stamp of the second.
fn commit_staging(
    slot: &Path,
    staging: &Path,
    scope: &Scope,
    label: &Label,
    base: &SnapshotStamp,
    captured_at: DateTime<Utc>,
    entries: BTreeMap<String, ManifestEntry>,
) -> Result<SnapshotHandle> {
    for suffix in 0..=MAX_STAMP_SUFFIX {
        let stamp = if suffix == 0 {
            base.clone()
        } else {
            base.with_suffix(suffix)?
        };
        let target = layout::snapshot_dir(slot, &stamp);
        if target.exists() {
            continue;
        }

        let manifest = SnapshotManifest::new(scope, label, &stamp, captured_at, entries.clone());
        let bytes = serde_json::to_vec_pretty(&manifest)
            .map_err(|e| serialization_error("encode_manifest", e))?;
        atomic_write(&staging.join(MANIFEST_FILE_NAME), &bytes)?;

        match fs::rename(staging, &target) {
            Ok(()) => {
                return Ok(SnapshotHandle {
                    scope: scope.clone(),
                    label: label.clone(),
                    stamp,
                    dir: target,
                })
            }
            // Another capture committed this stamp first.
            Err(_) if target.exists() => continue,
            Err(e) => return Err(io_error("commit_snapshot", &target, e)),
        }
    }

    Err(cmsnap_core::SnapError::new(SnapErrorKind::Internal)
        .with_op("commit_snapshot")
        .with_path(slot)
        .with_message(format!(
            "all {} stamps for second {} are taken",
            MAX_STAMP_SUFFIX + 1,
            base
        )))
}

fn read_manifest(handle: &SnapshotHandle) -> Result<SnapshotManifest> {
    let path = handle.dir.join(MANIFEST_FILE_NAME);
    let bytes = match fs::read(&path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(corrupt_data("read_manifest", &path, "snapshot manifest is missing"))
        }
        Err(e) => return Err(io_error("read_manifest", &path, e)),
    };
    let manifest: SnapshotManifest = serde_json::from_slice(&bytes)
        .map_err(|e| corrupt_data("read_manifest", &path, format!("invalid manifest: {}", e)))?;
    manifest.validate().map_err(|e| e.with_path(&path))?;

    let matches_handle = manifest.scope().ok().as_ref() == Some(&handle.scope)
        && manifest.label == handle.label
        && manifest.stamp == handle.stamp;
    if !matches_handle {
        return Err(corrupt_data(
            "read_manifest",
            &path,
            format!(
                "manifest describes {}/{}/{}, expected {}/{}/{}",
                manifest.profile,
                manifest.application,
                manifest.stamp,
                handle.scope,
                handle.label.as_str(),
                handle.stamp
            ),
        ));
    }

    for (name, entry) in &manifest.resources {
        validate_resource_name(name).map_err(|e| {
            corrupt_data("read_manifest", &path, e.message().to_string()).with_resource(name)
        })?;
        let expected = layout::resource_file_name(name);
        if entry.file != expected {
            return Err(corrupt_data(
                "read_manifest",
                &path,
                format!("resource stored as {:?}, expected {:?}", entry.file, expected),
            )
            .with_resource(name));
        }
    }
    Ok(manifest)
}

fn read_resource(dir: &Path, name: &str, entry: &ManifestEntry) -> Result<Value> {
    let path = dir.join(&entry.file);
    let bytes = match fs::read(&path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(corrupt_data("read_resource", &path, "resource file is missing")
                .with_resource(name))
        }
        Err(e) => return Err(io_error("read_resource", &path, e).with_resource(name)),
    };

    let digest = compute_content_digest(&bytes);
    if digest != entry.digest {
        return Err(corrupt_data(
            "read_resource",
            &path,
            format!("digest mismatch: recorded {}, found {}", entry.digest, digest),
        )
        .with_resource(name));
    }

    serde_json::from_slice(&bytes).map_err(|e| {
        corrupt_data("read_resource", &path, format!("invalid JSON: {}", e)).with_resource(name)
    })
}

fn load_snapshot(handle: &SnapshotHandle, mode: LoadMode) -> Result<Snapshot> {
    let manifest = read_manifest(handle)?;
    let captured_at = manifest.captured_at()?;

    let mut definitions = Vec::with_capacity(manifest.resources.len());
    let mut unreadable = BTreeMap::new();
    for (name, entry) in &manifest.resources {
        match read_resource(&handle.dir, name, entry) {
            Ok(definition) => definitions.push((name.clone(), definition)),
            Err(err) if mode == LoadMode::Tolerant && err.kind() == SnapErrorKind::CorruptData => {
                tracing::warn!(
                    resource = name.as_str(),
                    stamp = handle.stamp.as_str(),
                    reason = err.message(),
                    "Stored resource is unreadable"
                );
                unreadable.insert(name.clone(), err.message().to_string());
            }
            Err(err) => return Err(err),
        }
    }

    Ok(Snapshot::new(
        handle.scope.clone(),
        handle.label.clone(),
        handle.stamp.clone(),
        captured_at,
        definitions,
    )
    .with_unreadable(unreadable))
}
