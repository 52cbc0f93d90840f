//! Resource fetcher interface.
//!
//! A [`Fetcher`] is the only way resources enter the pipeline. The scope is
//! passed to every call; implementations must not depend on any ambient
//! "currently selected" platform context.

use crate::errors::{SnapError, SnapErrorKind};
use crate::model::Scope;
use serde_json::Value;
use std::collections::BTreeSet;
use std::path::PathBuf;
use thiserror::Error;

/// Failures talking to the platform (or whatever stands in for it).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FetchError {
    /// The external command could not be started
    #[error("failed to run {program}: {reason}")]
    Spawn { program: String, reason: String },

    /// The external command ran and reported failure
    #[error("{program} exited with {status}: {stderr}")]
    CommandFailed {
        program: String,
        status: String,
        stderr: String,
    },

    /// Output was not the structured document we asked for
    #[error("unexpected output from {source_name}: {reason}")]
    InvalidOutput { source_name: String, reason: String },

    /// A listed resource could not be retrieved any more
    #[error("resource {name} vanished during capture")]
    ResourceVanished { name: String },

    /// Local source could not be read
    #[error("cannot read {}: {reason}", .path.display())]
    Source { path: PathBuf, reason: String },

    /// The platform returned a name that cannot be stored
    #[error("invalid resource name {name:?}: {reason}")]
    InvalidName { name: String, reason: String },
}

impl From<FetchError> for SnapError {
    fn from(err: FetchError) -> Self {
        let base = SnapError::new(SnapErrorKind::Remote).with_op("fetch");
        match &err {
            FetchError::ResourceVanished { name } | FetchError::InvalidName { name, .. } => {
                base.with_resource(name.clone()).with_message(err.to_string())
            }
            FetchError::Source { path, .. } => base.with_path(path).with_message(err.to_string()),
            _ => base.with_message(err.to_string()),
        }
    }
}

/// Lists and retrieves resources of one scope.
///
/// Implementations apply their own retry policy and either return complete
/// data or an error; callers never persist partial results.
pub trait Fetcher: Send + Sync {
    fn list_resource_names(&self, scope: &Scope) -> Result<BTreeSet<String>, FetchError>;

    fn get_resource_definition(&self, scope: &Scope, name: &str) -> Result<Value, FetchError>;
}
