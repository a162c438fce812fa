use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, ValueEnum};

use ade_rs::{text, write_atom, Atom};

#[derive(Clone, Debug, Args)]
pub struct ConvertArgs {
    /// output format
    #[arg(short = 'o', long, value_enum)]
    pub output_type: OutputType,
    /// write to this file instead of stdout
    #[arg(short = 'w', long)]
    pub write_to: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum OutputType {
    Bin,
    Text,
}

pub fn convert(atoms: &[Atom], args: &ConvertArgs) -> Result<()> {
    let bytes = match args.output_type {
        OutputType::Bin => {
            let mut out = Vec::new();
            for atom in atoms {
                write_atom(atom, &mut out)?;
            }
            out
        }
        OutputType::Text => text::render_atoms(atoms)?.into_bytes(),
    };
    match &args.write_to {
        Some(path) => std::fs::write(path, bytes)?,
        None => std::io::stdout().write_all(&bytes)?,
    }
    Ok(())
}
