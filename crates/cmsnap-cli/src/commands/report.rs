//! Report command
//!
//! Usage: cmsnap report --profile <P> --app <A>

use crate::commands::scope_from_args;
use crate::Context;
use anyhow::{bail, Context as _, Result};
use clap::Args;
use cmsnap_core::diff::render_summary;
use cmsnap_core::Scope;
use cmsnap_engine::commands::{
    apply_engine_command, EngineCommand, EngineCommandResult, ReportOptions,
};
use cmsnap_store::SnapshotStore;

#[derive(Debug, Args)]
pub struct ReportArgs {
    #[arg(long)]
    pub profile: String,

    #[arg(long)]
    pub app: String,
}

/// Execute report command
pub fn execute(args: ReportArgs, ctx: &Context) -> Result<()> {
    let scope = scope_from_args(&args.profile, &args.app)?;
    run(&scope, ctx)
}

/// Diff, print the summary and write both artifacts.
pub fn run(scope: &Scope, ctx: &Context) -> Result<()> {
    let store = SnapshotStore::new(&ctx.config.root);
    let fetcher = ctx.config.fetcher();
    let cmd = EngineCommand::Report {
        scope: scope.clone(),
        options: ReportOptions {
            out: ctx.config.out.clone(),
            diff: ctx.config.diff_options()?,
        },
    };
    let result = match apply_engine_command(cmd, fetcher.as_ref(), &store)
        .with_context(|| format!("report {}", scope))?
    {
        EngineCommandResult::Reported(result) => result,
        other => bail!("unexpected engine result: {:?}", other),
    };

    println!(
        "Comparing {} before {} with after {}",
        scope,
        result.before.stamp(),
        result.after.stamp()
    );
    print!("{}", render_summary(&result.summary));
    for path in result.outcome.written() {
        println!("Report saved -> {}", path.display());
    }

    let failures = result.outcome.failures();
    if !failures.is_empty() {
        for (kind, err) in &failures {
            eprintln!("Failed to write {} report: {}", kind.extension(), err);
        }
        bail!("{} of 2 report artifacts could not be written", failures.len());
    }
    Ok(())
}
