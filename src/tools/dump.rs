use anyhow::Result;

use ade_rs::{text, Atom};

pub fn dump(atoms: &[Atom]) -> Result<()> {
    print!("{}", text::render_atoms(atoms)?);
    Ok(())
}
