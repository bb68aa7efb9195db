//! `ccvars get` command

use anyhow::Result;

use crate::cli::GetArgs;
use ccvars::ops::{load_session, SessionOptions};

pub fn execute(args: GetArgs, opts: &SessionOptions) -> Result<()> {
    let session = load_session(opts)?;
    let value = session.resolve(&args.name)?;
    println!("{}", value);
    Ok(())
}
