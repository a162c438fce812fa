mod convert;
use convert::convert;
mod dump;
use dump::dump;
mod query;
use query::query;
mod tree;
use tree::tree;

use ade_rs::{read_atoms, read_atoms_hex, read_container_file, text, Atom};

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};

/// Parse AtomContainer files and convert, dump or query their contents
#[derive(Clone, Debug, Parser)]
struct Args {
    /// input filename to parse
    #[arg(short, long)]
    input: PathBuf,
    /// parse the input as this format instead of sniffing it
    #[arg(short, long, value_enum)]
    force_type: Option<FileType>,
    // operation to execute
    #[command(subcommand)]
    operation: Operation,
}

/// File type to parse
#[derive(Clone, Copy, Debug, ValueEnum)]
enum FileType {
    /// binary AtomContainer stream
    Bin,
    /// hex rendering of a binary stream
    Hex,
    /// canonical text form
    Text,
}

#[derive(Clone, Debug, Subcommand)]
enum Operation {
    /// Print the canonical text form
    Dump,
    /// Convert between the binary and text representations
    Convert(convert::ConvertArgs),
    /// Resolve a path expression and print the matches
    Query(query::QueryArgs),
    /// Print the container structure without values
    Tree,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let bytes = std::fs::read(&args.input)?;
    let atoms = load_atoms(&bytes, args.force_type)?;
    match args.operation {
        Operation::Dump => dump(&atoms),
        Operation::Convert(convert_args) => convert(&atoms, &convert_args),
        Operation::Query(query_args) => query(&atoms, &query_args),
        Operation::Tree => tree(&atoms),
    }
}

fn load_atoms(bytes: &[u8], force_type: Option<FileType>) -> Result<Vec<Atom>> {
    let file_type = force_type.unwrap_or_else(|| sniff(bytes));
    match file_type {
        FileType::Bin => {
            // whole files declare their own length; concatenated atom
            // streams fall back to the plural entry point
            match read_container_file(bytes) {
                Ok(atom) => Ok(vec![atom]),
                Err(_) => Ok(read_atoms(bytes)?),
            }
        }
        FileType::Hex => Ok(read_atoms_hex(std::str::from_utf8(bytes)?)?),
        FileType::Text => Ok(text::parse_atoms(std::str::from_utf8(bytes)?)?),
    }
}

fn sniff(bytes: &[u8]) -> FileType {
    if bytes.len() >= 4 {
        let declared = u32::from_be_bytes(bytes[..4].try_into().unwrap()) as usize;
        if declared == bytes.len() {
            return FileType::Bin;
        }
    }
    match std::str::from_utf8(bytes) {
        Ok(string)
            if string
                .chars()
                .all(|c| c.is_ascii_hexdigit() || c.is_whitespace() || c == 'x') =>
        {
            FileType::Hex
        }
        Ok(_) => FileType::Text,
        Err(_) => FileType::Bin,
    }
}
