//! `ccvars refs` command

use anyhow::Result;

use ccvars::ops::{load_session, SessionOptions};

pub fn execute(opts: &SessionOptions) -> Result<()> {
    let session = load_session(opts)?;
    let references = session.external_references();

    if references.is_empty() {
        println!("No external references.");
        return Ok(());
    }

    for r in &references {
        println!("{} -> ${{{}}}", r.variable, r.reference);
    }

    Ok(())
}
