//! Command line interface definition

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "extup",
    version,
    about = "Bootstrap and update orchestrator for editor extension packages"
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args)]
pub struct GlobalArgs {
    /// Path to the configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Override the state directory
    #[arg(long, global = true)]
    pub state_dir: Option<PathBuf>,

    /// Emit results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable debug output
    #[arg(long, global = true)]
    pub debug: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Apply pending package deltas and configuration migrations
    Run,

    /// Show what a run would do, without touching anything
    Plan,

    /// Show recorded progress and whether work is pending
    Status,

    /// Seed the progress record with the current tool version
    Init {
        /// Version to record instead of the built-in one
        #[arg(long)]
        version_override: Option<String>,

        /// Overwrite an already-seeded record
        #[arg(long)]
        force: bool,
    },
}
