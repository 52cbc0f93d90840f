//! Capture orchestration: list, fetch concurrently, persist.
//!
//! Either every listed resource is fetched and the snapshot is committed, or
//! nothing is written.

#![allow(clippy::result_large_err)]

use cmsnap_core::errors::{Result, SnapError, SnapErrorKind};
use cmsnap_core::model::validate_resource_name;
use cmsnap_core::{log_op_end, log_op_error, log_op_start};
use cmsnap_core::{FetchError, Fetcher, Label, Scope};
use cmsnap_store::{SnapshotHandle, SnapshotStore};
use rayon::prelude::*;
use rayon::ThreadPoolBuilder;
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::time::Instant;

pub const DEFAULT_WORKERS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureOptions {
    /// Definitions fetched concurrently
    pub workers: usize,
}

impl Default for CaptureOptions {
    fn default() -> Self {
        Self {
            workers: DEFAULT_WORKERS,
        }
    }
}

/// A committed capture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureResult {
    pub handle: SnapshotHandle,
    pub resource_count: usize,
}

/// Fetch every definition on a bounded pool; the first failure wins.
fn fetch_definitions(
    fetcher: &dyn Fetcher,
    scope: &Scope,
    names: &BTreeSet<String>,
    workers: usize,
) -> Result<BTreeMap<String, Value>> {
    let pool = ThreadPoolBuilder::new()
        .num_threads(workers)
        .thread_name(|i| format!("cmsnap-fetch-{}", i))
        .build()
        .map_err(|e| {
            SnapError::new(SnapErrorKind::Internal)
                .with_op("fetch_pool")
                .with_message(format!("Failed to build fetch pool: {}", e))
        })?;

    let definitions: std::result::Result<BTreeMap<String, Value>, FetchError> = pool.install(|| {
        names
            .par_iter()
            .map(|name| {
                fetcher
                    .get_resource_definition(scope, name)
                    .map(|definition| (name.clone(), definition))
            })
            .collect()
    });
    Ok(definitions?)
}

fn capture_inner(
    fetcher: &dyn Fetcher,
    store: &SnapshotStore,
    scope: &Scope,
    label: &Label,
    options: &CaptureOptions,
) -> Result<CaptureResult> {
    if options.workers == 0 {
        return Err(cmsnap_core::errors::invalid_input(
            "capture",
            "workers must be at least 1",
        ));
    }

    let names = fetcher.list_resource_names(scope)?;
    for name in &names {
        validate_resource_name(name).map_err(|e| FetchError::InvalidName {
            name: name.clone(),
            reason: e.message().to_string(),
        })?;
    }
    tracing::info!(
        profile = scope.profile(),
        application = scope.application(),
        resource_count = names.len(),
        "Listed resources"
    );

    let definitions = fetch_definitions(fetcher, scope, &names, options.workers)?;
    let resource_count = definitions.len();
    let handle = store.capture(scope, label, definitions)?;
    Ok(CaptureResult {
        handle,
        resource_count,
    })
}

/// Capture the current resources of `scope` into the `label` slot.
///
/// # Errors
///
/// - `InvalidInput` if `workers` is zero
/// - `Remote` if listing or any fetch fails (no snapshot is written)
/// - `Io`/`Serialization` if the store cannot persist the snapshot
pub fn capture(
    fetcher: &dyn Fetcher,
    store: &SnapshotStore,
    scope: &Scope,
    label: &Label,
    options: &CaptureOptions,
) -> Result<CaptureResult> {
    let start = Instant::now();
    log_op_start!(
        "capture_command",
        profile = scope.profile(),
        application = scope.application(),
        label = label.as_str()
    );

    let result = capture_inner(fetcher, store, scope, label, options);
    let duration_ms = start.elapsed().as_millis() as u64;
    match &result {
        Ok(captured) => {
            log_op_end!(
                "capture_command",
                duration_ms = duration_ms,
                stamp = captured.handle.stamp().as_str(),
                resource_count = captured.resource_count
            );
        }
        Err(err) => log_op_error!("capture_command", err, duration_ms = duration_ms),
    }
    result
}
