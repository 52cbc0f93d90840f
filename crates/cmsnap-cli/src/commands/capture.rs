//! Capture command
//!
//! Usage: cmsnap capture --profile <P> --app <A> --label <before|after> [--compare]

use crate::commands::{report, scope_from_args};
use crate::Context;
use anyhow::{bail, Context as _, Result};
use clap::Args;
use cmsnap_core::Label;
use cmsnap_engine::commands::{apply_engine_command, EngineCommand, EngineCommandResult};
use cmsnap_store::SnapshotStore;

#[derive(Debug, Args)]
pub struct CaptureArgs {
    /// Platform context (cluster/project) to read from
    #[arg(long)]
    pub profile: String,

    /// Application namespace within the profile
    #[arg(long)]
    pub app: String,

    /// Snapshot slot
    #[arg(long, value_parser = [Label::BEFORE, Label::AFTER])]
    pub label: String,

    /// After an `after` capture, immediately run `report`
    #[arg(long)]
    pub compare: bool,
}

/// Execute capture command
pub fn execute(args: CaptureArgs, ctx: &Context) -> Result<()> {
    let scope = scope_from_args(&args.profile, &args.app)?;
    let label = Label::new(args.label.as_str())?;
    if args.compare && label != Label::after() {
        bail!("--compare is only valid with --label after");
    }

    let fetcher = ctx.config.fetcher();
    let store = SnapshotStore::new(&ctx.config.root);
    let cmd = EngineCommand::Capture {
        scope: scope.clone(),
        label: label.clone(),
        options: ctx.config.capture_options(),
    };
    let captured = match apply_engine_command(cmd, fetcher.as_ref(), &store)
        .with_context(|| format!("capture {} snapshot of {}", label.as_str(), scope))?
    {
        EngineCommandResult::Captured(captured) => captured,
        other => bail!("unexpected engine result: {:?}", other),
    };

    println!(
        "Captured {} ConfigMaps for {} ({}) -> {}",
        captured.resource_count,
        scope,
        label.as_str(),
        captured.handle.dir().display()
    );

    if args.compare {
        report::run(&scope, ctx)?;
    }
    Ok(())
}
