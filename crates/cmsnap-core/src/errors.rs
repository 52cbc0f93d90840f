//! Error facility for cmsnap
//!
//! Every fallible operation in the workspace returns [`SnapError`], a
//! structured error carrying a stable [`SnapErrorKind`] plus optional
//! context (operation, resource, path). Collaborator crates define their own
//! `thiserror` enums and convert into `SnapError` at the boundary.

use std::path::{Path, PathBuf};

/// Result type alias using SnapError
pub type Result<T> = std::result::Result<T, SnapError>;

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code used by tests, log events and the
/// CLI exit path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SnapErrorKind {
    /// Scope, label, resource name or configuration value is unusable
    InvalidInput,
    /// No snapshot exists for the requested scope and label
    NotFound,
    /// A persisted snapshot file is unparseable or fails its digest check
    CorruptData,
    /// Filesystem read or write failed
    Io,
    /// A value could not be encoded
    Serialization,
    /// The remote platform was unreachable, refused auth, or a resource vanished
    Remote,
    /// A report artifact could not be produced
    Render,
    /// Broken internal invariant
    Internal,
}

impl SnapErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            SnapErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            SnapErrorKind::NotFound => "ERR_NOT_FOUND",
            SnapErrorKind::CorruptData => "ERR_CORRUPT_DATA",
            SnapErrorKind::Io => "ERR_IO",
            SnapErrorKind::Serialization => "ERR_SERIALIZATION",
            SnapErrorKind::Remote => "ERR_REMOTE",
            SnapErrorKind::Render => "ERR_RENDER",
            SnapErrorKind::Internal => "ERR_INTERNAL",
        }
    }
}

/// Canonical structured error type
#[derive(Debug, Clone)]
pub struct SnapError {
    kind: SnapErrorKind,
    op: Option<String>,
    resource: Option<String>,
    path: Option<PathBuf>,
    message: String,
    source: Option<Box<SnapError>>,
}

impl SnapError {
    /// Create a new error with the specified kind
    pub fn new(kind: SnapErrorKind) -> Self {
        Self {
            kind,
            op: None,
            resource: None,
            path: None,
            message: String::new(),
            source: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add the name of the resource being processed
    pub fn with_resource(mut self, name: impl Into<String>) -> Self {
        self.resource = Some(name.into());
        self
    }

    /// Add the filesystem path involved
    pub fn with_path(mut self, path: impl AsRef<Path>) -> Self {
        self.path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Add source error
    pub fn with_source(mut self, source: SnapError) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    pub fn kind(&self) -> SnapErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    pub fn resource(&self) -> Option<&str> {
        self.resource.as_deref()
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn source_error(&self) -> Option<&SnapError> {
        self.source.as_deref()
    }
}

impl std::fmt::Display for SnapError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(resource) = &self.resource {
            write!(f, " (resource: {})", resource)?;
        }
        if let Some(path) = &self.path {
            write!(f, " (path: {})", path.display())?;
        }
        Ok(())
    }
}

impl std::error::Error for SnapError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

/// Create an IO error for `operation` on `path`
pub fn io_error(operation: &str, path: impl AsRef<Path>, err: std::io::Error) -> SnapError {
    SnapError::new(SnapErrorKind::Io)
        .with_op(operation)
        .with_path(path)
        .with_message(err.to_string())
}

/// Create an invalid-input error
pub fn invalid_input(operation: &str, reason: impl Into<String>) -> SnapError {
    SnapError::new(SnapErrorKind::InvalidInput)
        .with_op(operation)
        .with_message(reason)
}
