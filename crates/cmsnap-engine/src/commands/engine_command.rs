//! Engine-level commands and their dispatcher.

#![allow(clippy::result_large_err)]

use crate::commands::capture::{capture, CaptureOptions, CaptureResult};
use crate::commands::report::{report, ReportOptions, ReportResult};
use cmsnap_core::errors::Result;
use cmsnap_core::{Fetcher, Label, Scope};
use cmsnap_store::{SnapshotHandle, SnapshotStore};

/// Engine-level commands that require I/O (fetcher, store, output tree).
#[derive(Debug, Clone)]
pub enum EngineCommand {
    /// Capture the current resources of a scope into a label slot.
    Capture {
        scope: Scope,
        label: Label,
        options: CaptureOptions,
    },
    /// Diff the latest before/after snapshots and render the report.
    Report {
        scope: Scope,
        options: ReportOptions,
    },
    /// List committed snapshots, oldest first.
    List { scope: Scope, labels: Vec<Label> },
}

/// Result of applying an engine command.
#[derive(Debug)]
pub enum EngineCommandResult {
    Captured(CaptureResult),
    Reported(Box<ReportResult>),
    Listed(Vec<SnapshotHandle>),
}

/// Apply an engine command against a fetcher and a store.
pub fn apply_engine_command(
    cmd: EngineCommand,
    fetcher: &dyn Fetcher,
    store: &SnapshotStore,
) -> Result<EngineCommandResult> {
    match cmd {
        EngineCommand::Capture {
            scope,
            label,
            options,
        } => capture(fetcher, store, &scope, &label, &options).map(EngineCommandResult::Captured),
        EngineCommand::Report { scope, options } => report(store, &scope, &options)
            .map(|r| EngineCommandResult::Reported(Box::new(r))),
        EngineCommand::List { scope, labels } => {
            let mut handles = Vec::new();
            for label in &labels {
                handles.extend(store.list(&scope, label)?);
            }
            Ok(EngineCommandResult::Listed(handles))
        }
    }
}
