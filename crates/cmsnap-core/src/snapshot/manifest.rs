//! Snapshot manifest schema.
//!
//! Every committed snapshot directory holds a `_snapshot.json` manifest
//! describing what was captured:
//!
//! - `manifest_schema_version`: currently 1
//! - `profile`, `application`, `label`, `stamp`: the slot and id
//! - `captured_at`: RFC3339 capture instant
//! - `resources`: per resource the stored file name, its SHA-256 digest and size
//! - `snapshot_digest`: digest over all resource digests

use crate::errors::{Result, SnapError, SnapErrorKind};
use crate::model::{Label, Scope, SnapshotStamp};
use crate::snapshot::digest::compute_snapshot_digest;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const MANIFEST_SCHEMA_VERSION: u32 = 1;

/// File name of the manifest inside a snapshot directory.
pub const MANIFEST_FILE_NAME: &str = "_snapshot.json";

/// One stored resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    /// File name relative to the snapshot directory
    pub file: String,
    /// SHA-256 of the file content
    pub digest: String,
    pub size_bytes: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotManifest {
    pub manifest_schema_version: u32,
    pub profile: String,
    pub application: String,
    pub label: Label,
    pub stamp: SnapshotStamp,
    pub captured_at: String,
    pub resources: BTreeMap<String, ManifestEntry>,
    pub snapshot_digest: String,
}

impl SnapshotManifest {
    pub fn new(
        scope: &Scope,
        label: &Label,
        stamp: &SnapshotStamp,
        captured_at: DateTime<Utc>,
        resources: BTreeMap<String, ManifestEntry>,
    ) -> Self {
        let snapshot_digest = compute_snapshot_digest(&resources);
        Self {
            manifest_schema_version: MANIFEST_SCHEMA_VERSION,
            profile: scope.profile().to_string(),
            application: scope.application().to_string(),
            label: label.clone(),
            stamp: stamp.clone(),
            captured_at: captured_at.to_rfc3339_opts(SecondsFormat::Millis, true),
            resources,
            snapshot_digest,
        }
    }

    pub fn scope(&self) -> Result<Scope> {
        Scope::new(self.profile.clone(), self.application.clone())
    }

    pub fn captured_at(&self) -> Result<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.captured_at)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| {
                SnapError::new(SnapErrorKind::CorruptData)
                    .with_op("manifest_captured_at")
                    .with_message(format!("invalid captured_at {:?}: {}", self.captured_at, e))
            })
    }

    /// Check schema version and that `snapshot_digest` matches the entries.
    pub fn validate(&self) -> Result<()> {
        if self.manifest_schema_version != MANIFEST_SCHEMA_VERSION {
            return Err(SnapError::new(SnapErrorKind::CorruptData)
                .with_op("validate_manifest")
                .with_message(format!(
                    "unsupported manifest_schema_version {}",
                    self.manifest_schema_version
                )));
        }
        let computed = compute_snapshot_digest(&self.resources);
        if computed != self.snapshot_digest {
            return Err(SnapError::new(SnapErrorKind::CorruptData)
                .with_op("validate_manifest")
                .with_message(format!(
                    "snapshot_digest mismatch: recorded {}, computed {}",
                    self.snapshot_digest, computed
                )));
        }
        Ok(())
    }
}
