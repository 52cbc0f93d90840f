//! Snapshot differ.
//!
//! Compares two snapshots of the same scope and classifies every difference
//! as Added, Removed or Modified.
//!
//! ## Entry point
//!
//! ```ignore
//! use cmsnap_core::diff::{diff, summarize, render_summary};
//!
//! let records = diff(&before, &after);
//! let summary = summarize(&before, &after, &records);
//! println!("{}", render_summary(&summary));
//! ```
//!
//! ## Guarantees
//!
//! - **Determinism**: identical inputs produce identical record lists.
//! - **Order insensitivity**: element order inside sequences never matters.
//! - **Exclusivity**: a (resource, key) pair appears in at most one record.
//! - **Whole-resource granularity** for resources present on one side only.

pub mod engine;
pub mod model;
pub mod summary;

pub use engine::{diff, diff_with_options, equivalent};
pub use model::{ChangeKey, ChangeKind, ChangeRecord, ChangeValue, DiffOptions, KeyPath};
pub use summary::{render_summary, summarize, DiffSummary, ResourceStatus, ResourceSummary};
