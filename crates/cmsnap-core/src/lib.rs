//! cmsnap core - snapshot model, differ and shared facilities
//!
//! This crate provides:
//! - Scope, label, resource and snapshot types
//! - The snapshot manifest schema and content digests
//! - The order-insensitive structural differ and its change-record taxonomy
//! - The [`fetch::Fetcher`] interface through which resources are captured
//! - The error facility and the structured logging facility

pub mod diff;
pub mod errors;
pub mod fetch;
pub mod logging_facility;
pub mod model;
pub mod snapshot;

// Re-export commonly used types
pub use diff::{
    diff, diff_with_options, ChangeKey, ChangeKind, ChangeRecord, ChangeValue, DiffOptions,
    KeyPath,
};
pub use errors::{Result, SnapError, SnapErrorKind};
pub use fetch::{FetchError, Fetcher};
pub use model::{Label, Resource, Scope, Snapshot, SnapshotStamp};
