//! cmsnap Engine - Orchestration layer
//!
//! Provides the fetcher implementations and the capture/report commands that
//! coordinate between the core model, the snapshot store and the report
//! renderers.

pub mod commands;
pub mod fetchers;
