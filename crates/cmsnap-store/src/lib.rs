//! cmsnap Store - filesystem persistence of snapshots
//!
//! Provides:
//! - Atomic temp→rename file writes
//! - Staged, rename-committed snapshot directories with a digest manifest
//! - Slot queries (latest, list) and strict or tolerant loading

pub mod errors;
pub mod fs;
pub mod layout;
pub mod store;

// Re-export key types
pub use errors::Result;
pub use store::{SnapshotHandle, SnapshotStore};
