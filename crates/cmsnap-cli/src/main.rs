//! cmsnap CLI
//!
//! Capture ConfigMap snapshots and report the differences between them.

use anyhow::Result;
use clap::{Parser, Subcommand};
use cmsnap_core::logging_facility::{init, Profile};
use std::path::PathBuf;

mod commands;
mod config;

use config::Config;

#[derive(Debug, Parser)]
#[command(name = "cmsnap")]
#[command(about = "cmsnap - ConfigMap snapshot, diff and report", long_about = None)]
struct Cli {
    /// Configuration file (default: ./cmsnap.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Snapshot store root (overrides `root` in the config file)
    #[arg(long, global = true)]
    root: Option<PathBuf>,

    /// Report output root (overrides `out` in the config file)
    #[arg(long, global = true)]
    out: Option<PathBuf>,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Capture the current ConfigMaps of a scope
    Capture(commands::capture::CaptureArgs),
    /// Diff the latest before/after snapshots and write the report
    Report(commands::report::ReportArgs),
    /// List stored snapshots
    List(commands::list::ListArgs),
}

/// Shared state for every command.
pub struct Context {
    pub config: Config,
}

fn run(cli: Cli) -> Result<()> {
    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(root) = cli.root {
        config.root = root;
    }
    if let Some(out) = cli.out {
        config.out = out;
    }
    let ctx = Context { config };

    match cli.command {
        Commands::Capture(args) => commands::capture::execute(args, &ctx),
        Commands::Report(args) => commands::report::execute(args, &ctx),
        Commands::List(args) => commands::list::execute(args, &ctx),
    }
}

fn main() {
    let cli = Cli::parse();
    init(if cli.log_json {
        Profile::Production
    } else {
        Profile::Development
    });

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
