//! Digest computation for stored resources and snapshot manifests.
//!
//! - **Content digest**: SHA-256 of the exact bytes written for one resource
//! - **Snapshot digest**: SHA-256 over the sorted `(name, content digest)`
//!   pairs, identifying the resource set independently of when it was taken

use crate::snapshot::manifest::ManifestEntry;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

/// Hex-encoded SHA-256 of `bytes` (64 characters).
pub fn compute_content_digest(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// Digest of a whole resource set.
///
/// Entries are keyed by a `BTreeMap`, so the result does not depend on the
/// order in which resources were written.
pub fn compute_snapshot_digest(entries: &BTreeMap<String, ManifestEntry>) -> String {
    let mut hasher = Sha256::new();
    for (name, entry) in entries {
        hasher.update(name.as_bytes());
        hasher.update([0u8]);
        hasher.update(entry.digest.as_bytes());
        hasher.update([b'\n']);
    }
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(digest: &str) -> ManifestEntry {
        ManifestEntry {
            file: "x.json".to_string(),
            digest: digest.to_string(),
            size_bytes: 1,
        }
    }

    #[test]
    fn test_content_digest_is_sha256_hex() {
        let digest = compute_content_digest(b"test");
        assert_eq!(digest.len(), 64);
        assert_eq!(
            digest,
            "9f86d081884c7d659a2feaa0c55ad015a3bf4f1b2b0b822cd15d6c15b0f00a08"
        );
    }

    #[test]
    fn test_snapshot_digest_depends_on_content() {
        let a = BTreeMap::from([("cm1".to_string(), entry("aa"))]);
        let b = BTreeMap::from([("cm1".to_string(), entry("bb"))]);
        assert_ne!(compute_snapshot_digest(&a), compute_snapshot_digest(&b));
    }

    #[test]
    fn test_snapshot_digest_insertion_order_independent() {
        let mut a = BTreeMap::new();
        a.insert("x".to_string(), entry("1"));
        a.insert("y".to_string(), entry("2"));
        let mut b = BTreeMap::new();
        b.insert("y".to_string(), entry("2"));
        b.insert("x".to_string(), entry("1"));
        assert_eq!(compute_snapshot_digest(&a), compute_snapshot_digest(&b));
    }
}
