//! Subcommand implementations

pub mod capture;
pub mod list;
pub mod report;

use anyhow::Result;
use cmsnap_core::Scope;

/// Scope from the `--profile`/`--app` pair.
pub fn scope_from_args(profile: &str, app: &str) -> Result<Scope> {
    Ok(Scope::new(profile, app)?)
}
