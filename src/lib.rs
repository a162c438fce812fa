#![forbid(unsafe_code)]
//! Codec for the ADE AtomContainer format: a hierarchical, typed,
//! length-prefixed binary record format, its equivalent text rendering,
//! and a path expression language for querying atom trees.

pub mod atom;
pub mod error;
pub mod fourcc;
pub mod path;
pub mod stream;
pub mod tag;
pub mod text;
pub(crate) mod value;


pub use atom::{Atom, Descendants};
pub use error::{CodecError, Result};
pub use fourcc::FourCC;
pub use path::resolve_path;
pub use stream::{
    read_atom, read_atoms, read_atoms_hex, read_container_file, to_bytes, write_atom,
};
pub use tag::{AtomType, WidthClass};
pub use text::{parse_atom, parse_atoms, render_atom, render_atoms};
