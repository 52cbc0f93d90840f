//! Rendering both artifacts for one diff.

use crate::errors::RenderError;
use crate::rows::{artifact_stem, rows_from_records, ReportRow};
use crate::{pdf, xlsx};
use cmsnap_core::diff::ChangeRecord;
use cmsnap_core::errors::{io_error, SnapError};
use cmsnap_core::{log_op_end, log_op_error, log_op_start, Scope, SnapshotStamp};
use cmsnap_store::fs::atomic_write;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Spreadsheet,
    Document,
}

impl ArtifactKind {
    pub fn extension(&self) -> &'static str {
        match self {
            ArtifactKind::Spreadsheet => "xlsx",
            ArtifactKind::Document => "pdf",
        }
    }

    fn op(&self) -> &'static str {
        match self {
            ArtifactKind::Spreadsheet => "render_xlsx",
            ArtifactKind::Document => "render_pdf",
        }
    }
}

/// Per-artifact result of [`render_all`].
#[derive(Debug)]
pub struct ReportOutcome {
    pub spreadsheet: Result<PathBuf, SnapError>,
    pub document: Result<PathBuf, SnapError>,
}

impl ReportOutcome {
    /// True when both artifacts were written.
    pub fn is_complete(&self) -> bool {
        self.spreadsheet.is_ok() && self.document.is_ok()
    }

    pub fn written(&self) -> Vec<&Path> {
        [&self.spreadsheet, &self.document]
            .into_iter()
            .filter_map(|r| r.as_ref().ok().map(PathBuf::as_path))
            .collect()
    }

    pub fn failures(&self) -> Vec<(ArtifactKind, &SnapError)> {
        [
            (ArtifactKind::Spreadsheet, &self.spreadsheet),
            (ArtifactKind::Document, &self.document),
        ]
        .into_iter()
        .filter_map(|(kind, r)| r.as_ref().err().map(|e| (kind, e)))
        .collect()
    }
}

fn write_artifact(path: &Path, bytes: Result<Vec<u8>, RenderError>) -> Result<PathBuf, SnapError> {
    let bytes = bytes?;
    atomic_write(path, &bytes).map_err(|source| RenderError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(path.to_path_buf())
}

fn render_one(
    kind: ArtifactKind,
    dir: &Path,
    stem: &str,
    rows: &[ReportRow],
) -> Result<PathBuf, SnapError> {
    let start = Instant::now();
    let op = kind.op();
    log_op_start!(op, resource_count = rows.len());

    let path = dir.join(format!("{}.{}", stem, kind.extension()));
    let bytes = match kind {
        ArtifactKind::Spreadsheet => xlsx::render_xlsx(rows),
        ArtifactKind::Document => pdf::render_pdf(stem, rows),
    };
    let result = write_artifact(&path, bytes);

    let duration_ms = start.elapsed().as_millis() as u64;
    match &result {
        Ok(path) => {
            log_op_end!(op, duration_ms = duration_ms, path = %path.display());
        }
        Err(err) => log_op_error!(op, err, duration_ms = duration_ms),
    }
    result
}

/// Render the spreadsheet and the document for one diff.
///
/// Artifacts go to `<out>/<profile>/<application>/` and are named
/// `<profile>_<application>_diff_<after-stamp>.{xlsx,pdf}`. Each artifact
/// is attempted regardless of whether the other succeeded.
pub fn render_all(
    out: &Path,
    scope: &Scope,
    after_stamp: &SnapshotStamp,
    records: &[ChangeRecord],
) -> ReportOutcome {
    let dir = out.join(scope.profile()).join(scope.application());
    if let Err(e) = fs::create_dir_all(&dir) {
        let err = io_error("create_report_dir", &dir, e);
        return ReportOutcome {
            spreadsheet: Err(err.clone()),
            document: Err(err),
        };
    }

    let stem = artifact_stem(scope, after_stamp);
    let rows = rows_from_records(records);
    tracing::debug!(
        rows = rows.len(),
        pages = pdf::page_count(rows.len()),
        "Rendering report"
    );

    ReportOutcome {
        spreadsheet: render_one(ArtifactKind::Spreadsheet, &dir, &stem, &rows),
        document: render_one(ArtifactKind::Document, &dir, &stem, &rows),
    }
}
