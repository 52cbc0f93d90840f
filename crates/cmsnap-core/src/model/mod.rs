//! Domain model: scopes, labels, resources and snapshots.

pub mod scope;
pub mod snapshot;

pub use scope::{Label, Scope};
pub use snapshot::{validate_resource_name, Resource, Snapshot, SnapshotStamp};
