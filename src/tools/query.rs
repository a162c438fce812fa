use anyhow::Result;
use clap::Args;

use ade_rs::{resolve_path, Atom};

#[derive(Clone, Debug, Args)]
pub struct QueryArgs {
    /// path expression, e.g. `*/DOGS[@data >= 2]`
    pub path: String,
}

pub fn query(atoms: &[Atom], args: &QueryArgs) -> Result<()> {
    for root in atoms {
        for found in resolve_path(root, &args.path)? {
            print!("{found}");
        }
    }
    Ok(())
}
