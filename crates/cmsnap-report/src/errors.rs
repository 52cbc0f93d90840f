//! Render failures and their mapping onto the error facility

use cmsnap_core::errors::{SnapError, SnapErrorKind};
use std::path::PathBuf;
use thiserror::Error;

/// Why one report artifact could not be produced.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("spreadsheet encoding failed: {0}")]
    Spreadsheet(#[from] rust_xlsxwriter::XlsxError),

    #[error("document encoding failed: {0}")]
    Document(String),

    /// The encoded artifact could not be written to disk
    #[error("cannot write {}: {source}", .path.display())]
    Write { path: PathBuf, source: SnapError },
}

impl From<RenderError> for SnapError {
    fn from(err: RenderError) -> Self {
        match err {
            RenderError::Write { path, source } => SnapError::new(SnapErrorKind::Io)
                .with_op("write_artifact")
                .with_path(&path)
                .with_message(format!("cannot write report artifact: {}", source.message()))
                .with_source(source),
            other => SnapError::new(SnapErrorKind::Render)
                .with_op("render")
                .with_message(other.to_string()),
        }
    }
}
