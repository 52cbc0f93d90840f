//! Command orchestration layer.
//!
//! Provides high-level command functions that coordinate fetchers, the
//! snapshot store, the differ and the report renderers.

pub mod capture;
pub mod engine_command;
pub mod report;

pub use capture::{capture, CaptureOptions, CaptureResult};
pub use engine_command::{apply_engine_command, EngineCommand, EngineCommandResult};
pub use report::{report, ReportOptions, ReportResult};
