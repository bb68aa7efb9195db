//! CLI definitions using clap.

use std::path::PathBuf;

use ccvars::TargetOs;
use clap::{Args, Parser, Subcommand};

/// ccvars - toolchain variables for native build rule generators
#[derive(Parser)]
#[command(name = "ccvars")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Top of the source tree (defaults to the current directory)
    #[arg(long, global = true, env = "CCVARS_SOURCE_ROOT")]
    pub source_root: Option<PathBuf>,

    /// Target OS to resolve for (android, fuchsia, linux, darwin, windows)
    #[arg(long, global = true, env = "CCVARS_TARGET")]
    pub target: Option<TargetOs>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve and print every variable
    List(ListArgs),

    /// Resolve and print one variable
    Get(GetArgs),

    /// Show `${...}` references to variables declared elsewhere
    Refs,
}

#[derive(Args)]
pub struct ListArgs {
    /// Emit a JSON array instead of `Name = value` lines
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct GetArgs {
    /// Variable name
    pub name: String,
}
