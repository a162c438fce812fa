//! The binary framer.
//!
//! Wire format per atom: a big-endian u32 size covering header, payload and
//! (for containers) the whole child subtree, then 4 name bytes, then the
//! 4-ASCII type tag, then `size - 12` payload bytes. Containers carry no
//! payload; their children are the atoms that follow until the declared
//! size is consumed. Structure is recovered purely from a running offset
//! and a stack of open-container end offsets.

use log::debug;

use crate::atom::Atom;
use crate::error::{CodecError, Result};
use crate::fourcc::FourCC;
use crate::tag::AtomType;

pub const HEADER_LEN: usize = 12;

struct OpenContainer {
    atom: Atom,
    /// absolute offset at which this container's declared size runs out
    end: usize,
}

/// Read a stream of one or more concatenated atoms.
pub fn read_atoms(input: &[u8]) -> Result<Vec<Atom>> {
    let mut top_level = Vec::new();
    let mut stack: Vec<OpenContainer> = Vec::new();
    let mut pos = 0usize;

    fn attach(stack: &mut [OpenContainer], top_level: &mut Vec<Atom>, atom: Atom) {
        match stack.last_mut() {
            Some(open) => {
                // the stack only ever holds containers
                let ok = open.atom.add_child(atom);
                debug_assert!(ok);
            }
            None => top_level.push(atom),
        }
    }

    while pos < input.len() {
        let header = input.get(pos..pos + HEADER_LEN).ok_or_else(|| {
            CodecError::invalid(format!("truncated atom header at byte {pos}"))
        })?;
        let size = u32::from_be_bytes(header[..4].try_into().unwrap()) as usize;
        let name = FourCC::from_raw(header[4..8].try_into().unwrap());
        let tag = AtomType::from_raw(header[8..12].try_into().unwrap())?;
        if size < HEADER_LEN {
            return Err(CodecError::invalid(format!(
                "atom {name} declares {size} bytes, less than its header"
            )));
        }
        pos += HEADER_LEN;

        if tag.is_container() {
            let end = pos + size - HEADER_LEN;
            stack.push(OpenContainer {
                atom: Atom::with_name(name, tag),
                end,
            });
        } else {
            let payload_len = size - HEADER_LEN;
            let payload = input.get(pos..pos + payload_len).ok_or_else(|| {
                CodecError::invalid(format!(
                    "short read: atom {name} declares {payload_len} payload bytes \
                     but only {} remain",
                    input.len() - pos
                ))
            })?;
            pos += payload_len;
            attach(&mut stack, &mut top_level, Atom::from_parts(name, tag, payload.to_vec()));
        }

        // close every container whose declared size ends here; a container
        // whose end we ran past declared a lying size
        while let Some(open) = stack.last() {
            if open.end > pos {
                break;
            }
            if open.end < pos {
                return Err(CodecError::MalformedContainer(pos));
            }
            let open = stack.pop().unwrap();
            attach(&mut stack, &mut top_level, open.atom);
        }
    }

    if let Some(open) = stack.last() {
        return Err(CodecError::invalid(format!(
            "container {} declares {} bytes past the end of input",
            open.atom.name(),
            open.end - pos
        )));
    }
    Ok(top_level)
}

/// Single-atom entry point: the stream must contain exactly one top-level
/// atom.
pub fn read_atom(input: &[u8]) -> Result<Atom> {
    let mut atoms = read_atoms(input)?;
    if atoms.len() != 1 {
        return Err(CodecError::invalid(format!(
            "expected a single top-level atom, found {}",
            atoms.len()
        )));
    }
    Ok(atoms.pop().unwrap())
}

/// Whole-file entry point: the leading size field must equal the file
/// length.
pub fn read_container_file(input: &[u8]) -> Result<Atom> {
    let header: [u8; 4] = input
        .get(..4)
        .and_then(|b| b.try_into().ok())
        .ok_or_else(|| CodecError::invalid("container file shorter than a size field"))?;
    let declared = u64::from(u32::from_be_bytes(header));
    if declared != input.len() as u64 {
        return Err(CodecError::InvalidContainerFile {
            header: declared,
            actual: input.len() as u64,
        });
    }
    read_atom(input)
}

/// Encoded size of an atom including header and subtree.
pub fn encoded_len(atom: &Atom) -> usize {
    HEADER_LEN
        + atom.data().len()
        + atom.children().iter().map(encoded_len).sum::<usize>()
}

/// Depth-first pre-order serialization. Output parses back to an equal
/// tree, and re-serializing a parsed stream is a bitwise match.
pub fn write_atom(atom: &Atom, out: &mut impl std::io::Write) -> Result<()> {
    let size = encoded_len(atom);
    let size = u32::try_from(size)
        .map_err(|_| CodecError::invalid(format!("atom tree of {size} bytes overflows u32")))?;
    out.write_all(&size.to_be_bytes())?;
    out.write_all(atom.name().as_bytes())?;
    out.write_all(&atom.tag().into_raw())?;
    out.write_all(atom.data())?;
    for child in atom.children() {
        write_atom(child, out)?;
    }
    Ok(())
}

pub fn to_bytes(atom: &Atom) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(encoded_len(atom));
    write_atom(atom, &mut out)?;
    Ok(out)
}

/// Hex stream variant. Whitespace is ignored and an optional `0x` prefix
/// stripped; the digit count must be even. If the decoded bytes fail to
/// parse, adjacent byte pairs are swapped and parsing retried once, to
/// accommodate producers that emit wrong-endian nibble order.
pub fn read_atoms_hex(text: &str) -> Result<Vec<Atom>> {
    let digits: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    let digits = digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
        .unwrap_or(&digits);
    if digits.len() % 2 != 0 {
        return Err(CodecError::OddLength(digits.len()));
    }
    let mut bytes = Vec::with_capacity(digits.len() / 2);
    for pair in digits.as_bytes().chunks_exact(2) {
        let hi = (pair[0] as char).to_digit(16);
        let lo = (pair[1] as char).to_digit(16);
        match (hi, lo) {
            (Some(hi), Some(lo)) => bytes.push((hi * 16 + lo) as u8),
            _ => return Err(CodecError::invalid("hex stream contains a non-hex character")),
        }
    }
    match read_atoms(&bytes) {
        Ok(atoms) => Ok(atoms),
        Err(first) => {
            debug!("hex stream failed to parse ({first}), retrying byte-swapped");
            for pair in bytes.chunks_exact_mut(2) {
                pair.swap(0, 1);
            }
            read_atoms(&bytes).map_err(|_| first)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf_stream() -> Vec<u8> {
        let mut bytes = vec![0, 0, 0, 16];
        bytes.extend_from_slice(b"DOGSUI32");
        bytes.extend_from_slice(&[0, 0, 0, 1]);
        bytes
    }

    #[test]
    fn single_leaf() {
        let atom = read_atom(&leaf_stream()).unwrap();
        assert_eq!(atom.name().to_string(), "DOGS");
        assert_eq!(atom.as_uint().unwrap(), 1);
        assert_eq!(to_bytes(&atom).unwrap(), leaf_stream());
    }

    #[test]
    fn plural_and_singular_entry_points() {
        let mut two = leaf_stream();
        two.extend_from_slice(&leaf_stream());
        assert_eq!(read_atoms(&two).unwrap().len(), 2);
        assert!(matches!(read_atom(&two), Err(CodecError::InvalidInput(_))));
    }

    #[test]
    fn nested_containers_close_together() {
        // ROOT > MID_ > leaf, all three ending at the same offset
        let mut bytes = vec![0, 0, 0, 40];
        bytes.extend_from_slice(b"ROOTCONT");
        bytes.extend_from_slice(&[0, 0, 0, 28]);
        bytes.extend_from_slice(b"MID_CONT");
        bytes.extend_from_slice(&leaf_stream());
        let atom = read_atom(&bytes).unwrap();
        assert_eq!(atom.children_count(), 1);
        assert_eq!(atom.children()[0].children_count(), 1);
        assert_eq!(to_bytes(&atom).unwrap(), bytes);
    }

    #[test]
    fn lying_container_size() {
        // container declares 4 bytes of content, child needs 16
        let mut bytes = vec![0, 0, 0, 16];
        bytes.extend_from_slice(b"ROOTCONT");
        bytes.extend_from_slice(&leaf_stream());
        assert!(matches!(
            read_atoms(&bytes),
            Err(CodecError::MalformedContainer(_))
        ));
    }

    #[test]
    fn truncated_payload() {
        let mut bytes = leaf_stream();
        bytes.truncate(14);
        assert!(matches!(read_atoms(&bytes), Err(CodecError::InvalidInput(_))));
    }

    #[test]
    fn container_running_past_eof() {
        let mut bytes = vec![0, 0, 0, 100];
        bytes.extend_from_slice(b"ROOTCONT");
        assert!(matches!(read_atoms(&bytes), Err(CodecError::InvalidInput(_))));
    }

    #[test]
    fn unknown_tag_is_rejected() {
        let mut bytes = vec![0, 0, 0, 16];
        bytes.extend_from_slice(b"DOGSWOOF");
        bytes.extend_from_slice(&[0, 0, 0, 1]);
        assert!(matches!(read_atoms(&bytes), Err(CodecError::InvalidInput(_))));
    }

    #[test]
    fn undersized_header_is_rejected() {
        let mut bytes = vec![0, 0, 0, 4];
        bytes.extend_from_slice(b"DOGSUI32");
        assert!(matches!(read_atoms(&bytes), Err(CodecError::InvalidInput(_))));
    }

    #[test]
    fn empty_container() {
        let mut bytes = vec![0, 0, 0, 12];
        bytes.extend_from_slice(b"ROOTCONT");
        let atom = read_atom(&bytes).unwrap();
        assert!(atom.is_container());
        assert_eq!(atom.children_count(), 0);
        assert_eq!(to_bytes(&atom).unwrap(), bytes);
    }

    #[test]
    fn sibling_after_closed_container_attaches_to_parent() {
        // ROOT > (MID_ > leaf), leaf2 — leaf2 is ROOT's second child
        let mut bytes = vec![0, 0, 0, 56];
        bytes.extend_from_slice(b"ROOTCONT");
        bytes.extend_from_slice(&[0, 0, 0, 28]);
        bytes.extend_from_slice(b"MID_CONT");
        bytes.extend_from_slice(&leaf_stream());
        bytes.extend_from_slice(&leaf_stream());
        let atom = read_atom(&bytes).unwrap();
        assert_eq!(atom.children_count(), 2);
        assert_eq!(atom.children()[0].name().to_string(), "MID_");
        assert_eq!(atom.children()[1].name().to_string(), "DOGS");
        assert_eq!(to_bytes(&atom).unwrap(), bytes);
    }

    #[test]
    fn file_length_check() {
        let bytes = leaf_stream();
        assert!(read_container_file(&bytes).is_ok());
        let mut long = bytes.clone();
        long.push(0);
        assert!(matches!(
            read_container_file(&long),
            Err(CodecError::InvalidContainerFile { .. })
        ));
    }

    #[test]
    fn hex_and_swapped_hex() {
        let bytes = leaf_stream();
        let hex: String = bytes.iter().map(|b| format!("{b:02x}")).collect();
        let atoms = read_atoms_hex(&hex).unwrap();
        assert_eq!(atoms[0].as_uint().unwrap(), 1);

        let swapped: String = bytes
            .chunks_exact(2)
            .flat_map(|p| [format!("{:02x}", p[1]), format!("{:02x}", p[0])])
            .collect();
        let atoms = read_atoms_hex(&swapped).unwrap();
        assert_eq!(atoms[0].as_uint().unwrap(), 1);

        assert!(matches!(
            read_atoms_hex("0x123"),
            Err(CodecError::OddLength(3))
        ));
    }
}
