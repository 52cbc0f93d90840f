//! List command
//!
//! Usage: cmsnap list --profile <P> --app <A> [--label <L>]

use crate::commands::scope_from_args;
use crate::Context;
use anyhow::{bail, Result};
use clap::Args;
use cmsnap_core::Label;
use cmsnap_engine::commands::{apply_engine_command, EngineCommand, EngineCommandResult};
use cmsnap_store::SnapshotStore;

#[derive(Debug, Args)]
pub struct ListArgs {
    #[arg(long)]
    pub profile: String,

    #[arg(long)]
    pub app: String,

    /// Only this slot (default: before and after)
    #[arg(long)]
    pub label: Option<String>,
}

/// Execute list command
pub fn execute(args: ListArgs, ctx: &Context) -> Result<()> {
    let scope = scope_from_args(&args.profile, &args.app)?;
    let labels = match args.label {
        Some(label) => vec![Label::new(label)?],
        None => vec![Label::before(), Label::after()],
    };

    let store = SnapshotStore::new(&ctx.config.root);
    let fetcher = ctx.config.fetcher();
    let cmd = EngineCommand::List { scope, labels };
    let handles = match apply_engine_command(cmd, fetcher.as_ref(), &store)? {
        EngineCommandResult::Listed(handles) => handles,
        other => bail!("unexpected engine result: {:?}", other),
    };

    if handles.is_empty() {
        println!("No snapshots found.");
    }
    for handle in handles {
        println!(
            "{:<7} {:<19} {}",
            handle.label().as_str(),
            handle.stamp(),
            handle.dir().display()
        );
    }
    Ok(())
}
