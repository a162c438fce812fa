//! The canonical text format.
//!
//! Line-oriented and indentation-structured: `NAME:TYPE:VALUE` for leaves,
//! `NAME:CONT:` to open a container, children one tab deeper, and a line
//! of exactly `END` to close. The writer emits canonical form (tabs, Unix
//! line endings, delimited value renderings); the parser is
//! whitespace-tolerant around the separators and accepts either line
//! ending, so a loosely formatted input normalizes on round-trip.

use crate::atom::Atom;
use crate::error::{CodecError, Result};
use crate::fourcc::FourCC;
use crate::tag::AtomType;

/// Render one or more atoms in canonical text form.
pub fn render_atoms(atoms: &[Atom]) -> Result<String> {
    let mut out = String::new();
    for atom in atoms {
        render_into(atom, 0, &mut out)?;
    }
    Ok(out)
}

pub fn render_atom(atom: &Atom) -> Result<String> {
    render_atoms(std::slice::from_ref(atom))
}

fn render_into(atom: &Atom, depth: usize, out: &mut String) -> Result<()> {
    for _ in 0..depth {
        out.push('\t');
    }
    out.push_str(&atom.name().to_string());
    out.push(':');
    out.push_str(&atom.tag().to_string());
    out.push(':');
    if atom.is_container() {
        out.push('\n');
        for child in atom.children() {
            render_into(child, depth + 1, out)?;
        }
        for _ in 0..depth {
            out.push('\t');
        }
        out.push_str("END\n");
    } else {
        out.push_str(&atom.string_delimited()?);
        out.push('\n');
    }
    Ok(())
}

/// Parse text input into its top-level atoms.
pub fn parse_atoms(input: &str) -> Result<Vec<Atom>> {
    let mut top_level = Vec::new();
    let mut stack: Vec<Atom> = Vec::new();

    for (line_no, raw_line) in input.lines().enumerate() {
        let line = raw_line.trim();
        if line.is_empty() {
            continue;
        }
        if line == "END" {
            let Some(done) = stack.pop() else {
                return Err(CodecError::Syntax(format!(
                    "line {}: END without an open container",
                    line_no + 1
                )));
            };
            attach(&mut stack, &mut top_level, done);
            continue;
        }
        let atom = parse_line(line, line_no + 1)?;
        if atom.is_container() {
            stack.push(atom);
        } else {
            attach(&mut stack, &mut top_level, atom);
        }
    }
    if let Some(open) = stack.last() {
        return Err(CodecError::Syntax(format!(
            "container {} is never closed",
            open.name()
        )));
    }
    Ok(top_level)
}

/// Single-atom entry point, mirroring the binary framer.
pub fn parse_atom(input: &str) -> Result<Atom> {
    let mut atoms = parse_atoms(input)?;
    if atoms.len() != 1 {
        return Err(CodecError::invalid(format!(
            "expected a single top-level atom, found {}",
            atoms.len()
        )));
    }
    Ok(atoms.pop().unwrap())
}

fn attach(stack: &mut [Atom], top_level: &mut Vec<Atom>, atom: Atom) {
    match stack.last_mut() {
        Some(open) => {
            let ok = open.add_child(atom);
            debug_assert!(ok);
        }
        None => top_level.push(atom),
    }
}

/// `NAME : TYPE : VALUE` with optional whitespace around the separators.
/// The name is either exactly 4 characters or `0x` + 8 hex digits, so it
/// may itself contain a colon.
fn parse_line(line: &str, line_no: usize) -> Result<Atom> {
    let syntax = |what: &str| {
        CodecError::Syntax(format!("line {line_no}: {what}: {line:?}"))
    };

    let name_len = if line.starts_with("0x") || line.starts_with("0X") {
        10
    } else {
        4
    };
    if line.len() < name_len || !line.is_char_boundary(name_len) {
        return Err(syntax("missing atom name"));
    }
    let (name_text, rest) = line.split_at(name_len);
    let name = FourCC::parse(name_text).map_err(|_| syntax("bad atom name"))?;

    let rest = rest.trim_start();
    let rest = rest
        .strip_prefix(':')
        .ok_or_else(|| syntax("missing ':' after name"))?;
    let rest = rest.trim_start();
    if rest.len() < 4 || !rest.is_char_boundary(4) {
        return Err(syntax("missing type tag"));
    }
    let (tag_text, rest) = rest.split_at(4);
    let tag = AtomType::parse(tag_text).map_err(|_| syntax("bad type tag"))?;

    let rest = rest.trim_start();
    let rest = rest
        .strip_prefix(':')
        .ok_or_else(|| syntax("missing ':' after type"))?;
    let value = rest.trim();

    let mut atom = Atom::with_name(name, tag);
    match tag {
        AtomType::CONT | AtomType::NULL => {
            if !value.is_empty() {
                return Err(syntax("container and null atoms carry no value"));
            }
        }
        _ => atom.set_string_delimited(value)?,
    }
    Ok(atom)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASIC: &str = "ROOT:CONT:\n\tDOGS:UI32:1\nEND\n";

    #[test]
    fn canonical_round_trip() {
        let atom = parse_atom(BASIC).unwrap();
        assert!(atom.is_container());
        assert_eq!(atom.children_count(), 1);
        assert_eq!(atom.children()[0].as_uint().unwrap(), 1);
        assert_eq!(render_atom(&atom).unwrap(), BASIC);
    }

    #[test]
    fn loose_input_normalizes() {
        let loose = "  ROOT : CONT :\r\n  DOGS:UI32:  1\r\nEND\r\n";
        let atom = parse_atom(loose).unwrap();
        assert_eq!(render_atom(&atom).unwrap(), BASIC);
    }

    #[test]
    fn name_containing_colon() {
        let atom = parse_atom("A:BC:UI32:7\n").unwrap();
        assert_eq!(atom.name().to_string(), "A:BC");
        assert_eq!(atom.as_uint().unwrap(), 7);
    }

    #[test]
    fn hex_name() {
        let atom = parse_atom("0x00010203:UI32:7\n").unwrap();
        assert_eq!(atom.name().to_string(), "0x00010203");
        assert_eq!(render_atom(&atom).unwrap(), "0x00010203:UI32:7\n");
    }

    #[test]
    fn string_values_keep_quotes() {
        let text = "NOTE:CSTR:\"a \\\"quoted\\\" value\"\n";
        let atom = parse_atom(text).unwrap();
        assert_eq!(atom.string_raw().unwrap(), "a \\\"quoted\\\" value");
        assert_eq!(render_atom(&atom).unwrap(), text);
    }

    #[test]
    fn structural_errors() {
        assert!(matches!(parse_atoms("END\n"), Err(CodecError::Syntax(_))));
        assert!(matches!(
            parse_atoms("ROOT:CONT:\n"),
            Err(CodecError::Syntax(_))
        ));
        assert!(matches!(
            parse_atoms("ROOT:CONT:oops\nEND\n"),
            Err(CodecError::Syntax(_))
        ));
        assert!(matches!(
            parse_atoms("ROOT:WHAT:1\n"),
            Err(CodecError::Syntax(_))
        ));
    }

    #[test]
    fn nested_containers() {
        let text = "AAAA:CONT:\n\tBBBB:CONT:\n\t\tCCCC:UI08:9\n\tEND\n\tDDDD:NULL:\nEND\n";
        let atom = parse_atom(text).unwrap();
        assert_eq!(atom.children_count(), 2);
        assert_eq!(atom.children()[0].children()[0].as_uint().unwrap(), 9);
        assert_eq!(atom.children()[1].tag(), AtomType::NULL);
        assert_eq!(render_atom(&atom).unwrap(), text);
    }

    #[test]
    fn indentation_is_advisory() {
        // structure comes from CONT/END, not from the indentation
        let flat = "AAAA:CONT:\nBBBB:UI32:5\nEND\n";
        let atom = parse_atom(flat).unwrap();
        assert_eq!(atom.children_count(), 1);
        assert_eq!(render_atom(&atom).unwrap(), "AAAA:CONT:\n\tBBBB:UI32:5\nEND\n");
    }

    #[test]
    fn multiple_top_level_atoms() {
        let atoms = parse_atoms("AAAA:UI32:1\nBBBB:UI32:2\n").unwrap();
        assert_eq!(atoms.len(), 2);
        assert!(parse_atom("AAAA:UI32:1\nBBBB:UI32:2\n").is_err());
    }
}
