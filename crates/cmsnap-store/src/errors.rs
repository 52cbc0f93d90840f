//! Error handling for cmsnap-store
//!
//! Wraps cmsnap-core SnapError with store-specific helpers

use cmsnap_core::errors::{SnapError, SnapErrorKind};
use cmsnap_core::{Label, Scope};
use std::path::Path;

pub use cmsnap_core::errors::{io_error, Result};

/// Create a corrupt-data error for a stored file
pub fn corrupt_data(operation: &str, path: &Path, reason: impl Into<String>) -> SnapError {
    SnapError::new(SnapErrorKind::CorruptData)
        .with_op(operation)
        .with_path(path)
        .with_message(reason)
}

/// Create a snapshot-not-found error for a slot
pub fn snapshot_not_found(scope: &Scope, label: &Label) -> SnapError {
    SnapError::new(SnapErrorKind::NotFound)
        .with_op("latest")
        .with_message(format!(
            "no '{}' snapshot exists for {}",
            label.as_str(),
            scope
        ))
}

/// Create a serialization error from serde_json::Error
pub fn serialization_error(operation: &str, err: serde_json::Error) -> SnapError {
    SnapError::new(SnapErrorKind::Serialization)
        .with_op(operation)
        .with_message(err.to_string())
}
