//! `ccvars list` command

use anyhow::{Context, Result};

use crate::cli::ListArgs;
use ccvars::ops::{load_session, SessionOptions};

pub fn execute(args: ListArgs, opts: &SessionOptions) -> Result<()> {
    let session = load_session(opts)?;
    let variables = session.list()?;

    if args.json {
        let json = serde_json::to_string_pretty(&variables)
            .context("failed to serialize variables")?;
        println!("{}", json);
        return Ok(());
    }

    println!(
        "# {} ({}, {})",
        session.registry.namespace(),
        session.target(),
        session.compiler_version
    );
    for variable in &variables {
        println!("{} = {}", variable.name, variable.value);
    }

    Ok(())
}
