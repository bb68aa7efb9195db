//! ccvars CLI - inspect the toolchain variable registry

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use ccvars::ops::SessionOptions;
use ccvars::util::diagnostic::emit;
use ccvars::RegistryError;

mod cli;
mod commands;

use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();
    let color = !cli.no_color;

    if let Err(e) = run(cli) {
        match e.downcast_ref::<RegistryError>() {
            Some(err) => emit(&err.to_diagnostic(), color),
            None => eprintln!("error: {:#}", e),
        }
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("ccvars=debug")
    } else {
        EnvFilter::new("ccvars=info")
    };

    // Values go to stdout, so logs must not
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    let opts = SessionOptions {
        source_root: cli.source_root,
        target: cli.target,
        global_config: None,
    };

    match cli.command {
        Commands::List(args) => commands::list::execute(args, &opts),
        Commands::Get(args) => commands::get::execute(args, &opts),
        Commands::Refs => commands::refs::execute(&opts),
    }
}
