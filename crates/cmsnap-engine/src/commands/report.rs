//! Report orchestration: latest before/after → diff → summary → artifacts.

#![allow(clippy::result_large_err)]

use cmsnap_core::diff::{diff_with_options, summarize, ChangeRecord, DiffOptions, DiffSummary};
use cmsnap_core::errors::{Result, SnapErrorKind};
use cmsnap_core::{log_op_end, log_op_error, log_op_start};
use cmsnap_core::{Label, Scope};
use cmsnap_report::{render_all, ReportOutcome};
use cmsnap_store::{SnapshotHandle, SnapshotStore};
use std::path::PathBuf;
use std::time::Instant;

#[derive(Debug, Clone, Default)]
pub struct ReportOptions {
    /// Root of the report output tree
    pub out: PathBuf,
    pub diff: DiffOptions,
}

/// Everything one `report` run produced.
#[derive(Debug)]
pub struct ReportResult {
    pub before: SnapshotHandle,
    pub after: SnapshotHandle,
    pub records: Vec<ChangeRecord>,
    pub summary: DiffSummary,
    pub outcome: ReportOutcome,
}

fn latest_with_guidance(
    store: &SnapshotStore,
    scope: &Scope,
    label: &Label,
) -> Result<SnapshotHandle> {
    store.latest(scope, label).map_err(|err| {
        if err.kind() == SnapErrorKind::NotFound {
            let message = format!(
                "{}; run `cmsnap capture --profile {} --app {} --label {}` first",
                err.message(),
                scope.profile(),
                scope.application(),
                label.as_str()
            );
            err.with_op("report").with_message(message)
        } else {
            err
        }
    })
}

fn report_inner(
    store: &SnapshotStore,
    scope: &Scope,
    options: &ReportOptions,
) -> Result<ReportResult> {
    let before = latest_with_guidance(store, scope, &Label::before())?;
    let after = latest_with_guidance(store, scope, &Label::after())?;

    let before_snapshot = store.load_tolerant(&before)?;
    let after_snapshot = store.load_tolerant(&after)?;

    let records = diff_with_options(&before_snapshot, &after_snapshot, &options.diff);
    let summary = summarize(&before_snapshot, &after_snapshot, &records);
    let outcome = render_all(&options.out, scope, after.stamp(), &records);

    Ok(ReportResult {
        before,
        after,
        records,
        summary,
        outcome,
    })
}

/// Diff the latest `before` and `after` snapshots of `scope` and render the
/// report artifacts.
///
/// Artifact failures do not fail the call; inspect
/// [`ReportResult::outcome`].
///
/// # Errors
///
/// - `NotFound` (with capture guidance) if either slot is empty
/// - `CorruptData` if a snapshot manifest is unusable
pub fn report(
    store: &SnapshotStore,
    scope: &Scope,
    options: &ReportOptions,
) -> Result<ReportResult> {
    let start = Instant::now();
    log_op_start!(
        "report",
        profile = scope.profile(),
        application = scope.application()
    );

    let result = report_inner(store, scope, options);
    let duration_ms = start.elapsed().as_millis() as u64;
    match &result {
        Ok(report) => {
            log_op_end!(
                "report",
                duration_ms = duration_ms,
                profile = scope.profile(),
                application = scope.application(),
                change_count = report.records.len(),
                complete = report.outcome.is_complete()
            );
        }
        Err(err) => log_op_error!("report", err, duration_ms = duration_ms),
    }
    result
}
