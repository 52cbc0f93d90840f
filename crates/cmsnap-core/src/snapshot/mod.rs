//! Snapshot manifest and digest logic.
//!
//! ## Responsibilities
//!
//! - Define the manifest schema written next to every stored snapshot
//! - Compute deterministic content digests
//!
//! ## Non-Responsibilities
//!
//! - Persistence (handled by `cmsnap-store`)
//! - Fetching (handled by `cmsnap-engine`)

pub mod digest;
pub mod manifest;

pub use digest::{compute_content_digest, compute_snapshot_digest};
pub use manifest::{ManifestEntry, SnapshotManifest, MANIFEST_FILE_NAME, MANIFEST_SCHEMA_VERSION};
