use serde::Serialize;

use crate::error::Result;
use crate::fourcc::FourCC;
use crate::tag::AtomType;
use crate::value;

/// One node of an AtomContainer tree: a 4-byte name, a type tag, and either
/// a typed payload or (for the container tag) an ordered list of children.
///
/// The invariants are enforced by construction: a non-container never has
/// children, a container never has payload, and a fixed-width payload
/// always matches the tag's width unless a raw stream said otherwise.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Atom {
    name: FourCC,
    tag: AtomType,
    data: Vec<u8>,
    children: Vec<Atom>,
}

impl Atom {
    /// Create an atom from a textual name (either 4 characters or
    /// `0x` + 8 hex digits). The payload is zero-initialized to the
    /// tag's width.
    pub fn new(name: &str, tag: AtomType) -> Result<Self> {
        Ok(Self::with_name(FourCC::parse(name)?, tag))
    }

    pub fn with_name(name: FourCC, tag: AtomType) -> Self {
        Atom {
            name,
            tag,
            data: tag.empty_payload(),
            children: Vec::new(),
        }
    }

    /// Used by the framers, which take the payload as the stream declared
    /// it. Width checks happen at conversion time.
    pub(crate) fn from_parts(name: FourCC, tag: AtomType, data: Vec<u8>) -> Self {
        Atom {
            name,
            tag,
            data,
            children: Vec::new(),
        }
    }

    pub fn name(&self) -> FourCC {
        self.name
    }

    pub fn tag(&self) -> AtomType {
        self.tag
    }

    /// The raw payload bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn children(&self) -> &[Atom] {
        &self.children
    }

    pub fn is_container(&self) -> bool {
        self.tag.is_container()
    }

    /// Change the type tag. The payload is reallocated and zero-filled to
    /// the new tag's width; children survive only a container-to-container
    /// change.
    pub fn set_tag(&mut self, tag: AtomType) {
        self.tag = tag;
        self.data = tag.empty_payload();
        if !tag.is_container() {
            self.children.clear();
        }
    }

    /// Append a child, taking ownership. Fails silently on a non-container
    /// receiver: the child is dropped and `false` returned.
    pub fn add_child(&mut self, child: Atom) -> bool {
        self.try_add_child(child).is_ok()
    }

    /// Like [`Atom::add_child`], but hands the child back on refusal.
    pub fn try_add_child(&mut self, child: Atom) -> Result<(), Atom> {
        if !self.is_container() {
            return Err(child);
        }
        self.children.push(child);
        Ok(())
    }

    /// Number of children, or -1 when the receiver is not a container.
    pub fn children_count(&self) -> i64 {
        if self.is_container() {
            self.children.len() as i64
        } else {
            -1
        }
    }

    /// First child with the given name, in either textual form.
    pub fn find_child(&self, name: &str) -> Option<&Atom> {
        let name = FourCC::parse(name).ok()?;
        self.children.iter().find(|child| child.name() == name)
    }

    /// Detach the child at `index`, handing ownership back to the caller.
    pub fn remove_child(&mut self, index: usize) -> Option<Atom> {
        if index < self.children.len() {
            Some(self.children.remove(index))
        } else {
            None
        }
    }

    /// Detach every child, leaving an empty container.
    pub fn take_children(&mut self) -> Vec<Atom> {
        std::mem::take(&mut self.children)
    }

    /// Pre-order, self-inclusive traversal.
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants { stack: vec![self] }
    }

    // typed setters: each delegates to the encoder selected by the current
    // tag and leaves the payload untouched on failure

    pub fn set_uint(&mut self, value: u64) -> Result<()> {
        self.data = value::encode_uint(self.tag, value)?;
        Ok(())
    }

    pub fn set_int(&mut self, value: i64) -> Result<()> {
        self.data = value::encode_int(self.tag, value)?;
        Ok(())
    }

    pub fn set_float(&mut self, value: f64) -> Result<()> {
        self.data = value::encode_float(self.tag, value)?;
        Ok(())
    }

    pub fn set_bool(&mut self, value: bool) -> Result<()> {
        self.data = value::encode_bool(self.tag, value)?;
        Ok(())
    }

    pub fn set_uint_pair(&mut self, num: u64, den: u64) -> Result<()> {
        self.data = value::encode_uint_pair(self.tag, num, den)?;
        Ok(())
    }

    pub fn set_int_pair(&mut self, num: i64, den: i64) -> Result<()> {
        self.data = value::encode_int_pair(self.tag, num, den)?;
        Ok(())
    }

    pub fn set_bytes(&mut self, raw: &[u8]) -> Result<()> {
        self.data = value::encode_bytes(self.tag, raw)?;
        Ok(())
    }

    /// Set from the raw (undelimited) text form of the current tag.
    pub fn set_string(&mut self, text: &str) -> Result<()> {
        self.data = value::encode_string(self.tag, text)?;
        Ok(())
    }

    /// Set from the delimited text form, as it appears in the text format.
    pub fn set_string_delimited(&mut self, text: &str) -> Result<()> {
        self.data = value::encode_string_delimited(self.tag, text)?;
        Ok(())
    }

    // typed getters

    pub fn as_uint(&self) -> Result<u64> {
        value::decode_uint(self.tag, &self.data)
    }

    pub fn as_int(&self) -> Result<i64> {
        value::decode_int(self.tag, &self.data)
    }

    pub fn as_float(&self) -> Result<f64> {
        value::decode_float(self.tag, &self.data)
    }

    pub fn as_bool(&self) -> Result<bool> {
        value::decode_bool(self.tag, &self.data)
    }

    pub fn as_uint_pair(&self) -> Result<[u64; 2]> {
        value::decode_uint_pair(self.tag, &self.data)
    }

    pub fn as_int_pair(&self) -> Result<[i64; 2]> {
        value::decode_int_pair(self.tag, &self.data)
    }

    pub fn as_bytes(&self) -> Result<&[u8]> {
        value::decode_bytes(self.tag, &self.data)
    }

    pub fn string_raw(&self) -> Result<String> {
        value::string_raw(self.tag, &self.data)
    }

    pub fn string_delimited(&self) -> Result<String> {
        value::string_delimited(self.tag, &self.data)
    }

    /// The delimited value rendering, falling back to a hex dump of the
    /// payload when the bytes do not decode under the current tag.
    pub(crate) fn value_text_lossy(&self) -> String {
        match self.string_delimited() {
            Ok(text) => text,
            Err(_) => value::data::render(&self.data).unwrap_or_default(),
        }
    }
}

impl std::fmt::Display for Atom {
    /// Canonical text rendering of the subtree.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        fn walk(atom: &Atom, depth: usize, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            let indent = "\t".repeat(depth);
            if atom.is_container() {
                writeln!(f, "{indent}{}:{}:", atom.name, atom.tag)?;
                for child in &atom.children {
                    walk(child, depth + 1, f)?;
                }
                writeln!(f, "{indent}END")
            } else {
                writeln!(
                    f,
                    "{indent}{}:{}:{}",
                    atom.name,
                    atom.tag,
                    atom.value_text_lossy()
                )
            }
        }
        walk(self, 0, f)
    }
}

/// Lazy pre-order iterator over a subtree, produced by
/// [`Atom::descendants`].
pub struct Descendants<'a> {
    stack: Vec<&'a Atom>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a Atom;

    fn next(&mut self) -> Option<Self::Item> {
        let atom = self.stack.pop()?;
        self.stack.extend(atom.children.iter().rev());
        Some(atom)
    }
}
