//! The path engine: an XPath-inspired query language over an atom tree.
//!
//! A path is a slash-separated sequence of elements of shape
//! `name[predicate]`. The name is a literal 4-character (or `0x`-hex)
//! atom name, `*` for any one atom, or `**` for any sequence of atoms at
//! any depth. Resolution starts at the root's children and descends level
//! by level; the optional predicate filters each level's candidates.

mod eval;
mod lexer;
mod parser;

use log::debug;

use crate::atom::Atom;
use crate::error::{CodecError, Result};
use crate::fourcc::FourCC;

use parser::Item;

enum ElementKind {
    Literal(FourCC),
    Any,
    Descend,
}

struct PathElement {
    kind: ElementKind,
    predicate: Option<Vec<Item>>,
    /// original element text, for diagnostics
    text: String,
}

impl PathElement {
    fn name_text(&self) -> String {
        match self.predicate {
            Some(_) => match self.text.split_once('[') {
                Some((name, _)) => name.to_string(),
                None => self.text.clone(),
            },
            None => self.text.clone(),
        }
    }
}

/// Resolve a path expression against `root`, returning matches in document
/// order.
///
/// An empty result at the terminal element is not an error; an element
/// before the last resolving to nothing is reported as [`CodecError::NotFound`]
/// naming the resolved prefix and the element that failed.
pub fn resolve_path<'t>(root: &'t Atom, path: &str) -> Result<Vec<&'t Atom>> {
    let elements = parse_path(path)?;
    debug!("resolving path {path:?} ({} elements)", elements.len());

    let mut current: Vec<&'t Atom> = vec![root];
    let mut partial = root.name().to_string();

    for (index, element) in elements.iter().enumerate() {
        let mut selected: Vec<&'t Atom> = Vec::new();
        for parent in &current {
            let group: Vec<&'t Atom> = match &element.kind {
                ElementKind::Literal(name) => parent
                    .children()
                    .iter()
                    .filter(|child| child.name() == *name)
                    .collect(),
                ElementKind::Any => parent.children().iter().collect(),
                // zero-or-more levels: the parent itself plus everything
                // below it
                ElementKind::Descend => parent.descendants().collect(),
            };
            let last = group.len();
            for (offset, candidate) in group.into_iter().enumerate() {
                let keep = match &element.predicate {
                    Some(items) => eval::eval(items, candidate, offset + 1, last)?,
                    None => true,
                };
                if keep {
                    selected.push(candidate);
                }
            }
        }
        dedup_in_order(&mut selected);

        if selected.is_empty() && index + 1 < elements.len() {
            return Err(CodecError::NotFound {
                parent: current
                    .first()
                    .map(|atom| atom.name().to_string())
                    .unwrap_or_default(),
                element: element.name_text(),
                partial,
            });
        }
        partial.push('/');
        partial.push_str(&element.text);
        current = selected;
    }
    Ok(current)
}

/// `**` can hand the same atom to several parents; keep the first sighting
/// only, preserving document order.
fn dedup_in_order(atoms: &mut Vec<&Atom>) {
    let mut seen: Vec<*const Atom> = Vec::with_capacity(atoms.len());
    atoms.retain(|atom| {
        let ptr: *const Atom = *atom;
        if seen.contains(&ptr) {
            false
        } else {
            seen.push(ptr);
            true
        }
    });
}

fn parse_path(path: &str) -> Result<Vec<PathElement>> {
    if path.is_empty() {
        return Err(CodecError::Syntax("empty path".into()));
    }
    split_elements(path)?
        .into_iter()
        .map(parse_element)
        .collect()
}

/// Split on `/`, but not inside a predicate or a quoted string.
fn split_elements(path: &str) -> Result<Vec<String>> {
    let mut elements = Vec::new();
    let mut element = String::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;

    for c in path.chars() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '\'' | '"') => quote = Some(c),
            (None, '[') => depth += 1,
            (None, ']') => {
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| CodecError::Syntax(format!("stray ']' in path {path:?}")))?;
            }
            (None, '/') if depth == 0 => {
                elements.push(std::mem::take(&mut element));
                continue;
            }
            (None, _) => {}
        }
        element.push(c);
    }
    if quote.is_some() {
        return Err(CodecError::Syntax(format!(
            "unterminated string in path {path:?}"
        )));
    }
    if depth != 0 {
        return Err(CodecError::Syntax(format!(
            "unterminated predicate in path {path:?}"
        )));
    }
    elements.push(element);
    if elements.iter().any(String::is_empty) {
        return Err(CodecError::Syntax(format!(
            "empty element in path {path:?}"
        )));
    }
    Ok(elements)
}

fn parse_element(text: String) -> Result<PathElement> {
    let (name_text, predicate) = match text.split_once('[') {
        Some((name, rest)) => {
            let body = rest.strip_suffix(']').ok_or_else(|| {
                CodecError::Syntax(format!("unterminated predicate in {text:?}"))
            })?;
            let items = parser::compile(lexer::tokenize(body)?)?;
            (name.to_string(), Some(items))
        }
        None => (text.clone(), None),
    };
    let kind = match name_text.as_str() {
        "*" => ElementKind::Any,
        "**" => ElementKind::Descend,
        literal => ElementKind::Literal(FourCC::parse(literal).map_err(|_| {
            CodecError::Syntax(format!("bad atom name {literal:?} in path element"))
        })?),
    };
    Ok(PathElement {
        kind,
        predicate,
        text,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tag::AtomType;

    fn ui32(name: &str, value: u64) -> Atom {
        let mut atom = Atom::new(name, AtomType::UI32).unwrap();
        atom.set_uint(value).unwrap();
        atom
    }

    fn cont(name: &str) -> Atom {
        Atom::new(name, AtomType::CONT).unwrap()
    }

    /// ROOT with three kennels each holding a DOGS counter, plus a deep
    /// chain ending in LF5A.
    fn fixture() -> Atom {
        let mut root = cont("ROOT");
        for (kennel, value) in [("KNLA", 1), ("KNLB", 2), ("KNLC", 3)] {
            let mut kennel = cont(kennel);
            kennel.add_child(ui32("DOGS", value));
            root.add_child(kennel);
        }
        let mut cn1a = cont("CN1A");
        let mut cn2a = cont("CN2A");
        let mut cn3a = cont("CN3A");
        let mut cn4a = cont("CN4A");
        cn4a.add_child(ui32("LF5A", 1));
        cn3a.add_child(cn4a);
        cn2a.add_child(cn3a);
        cn1a.add_child(cn2a);
        root.add_child(cn1a);
        root
    }

    #[test]
    fn literal_chain() {
        let root = fixture();
        let found = resolve_path(&root, "CN1A/CN2A/CN3A/CN4A/LF5A").unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name().to_string(), "LF5A");
        assert_eq!(found[0].as_uint().unwrap(), 1);
    }

    #[test]
    fn wildcard_collects_in_document_order() {
        let root = fixture();
        let found = resolve_path(&root, "*/DOGS").unwrap();
        let values: Vec<u64> = found.iter().map(|a| a.as_uint().unwrap()).collect();
        assert_eq!(values, [1, 2, 3]);
    }

    #[test]
    fn descent_wildcard() {
        let root = fixture();
        let found = resolve_path(&root, "**/DOGS").unwrap();
        assert_eq!(found.len(), 3);
        let found = resolve_path(&root, "**/LF5A").unwrap();
        assert_eq!(found.len(), 1);
    }

    #[test]
    fn intermediate_miss_is_an_error() {
        let root = fixture();
        let err = resolve_path(&root, "THER/E IS/NOTH/INGH/ERE.").unwrap_err();
        let text = err.to_string();
        assert!(text.contains("'ROOT'"), "{text}");
        assert!(text.contains("'THER'"), "{text}");
    }

    #[test]
    fn terminal_miss_is_empty() {
        let root = fixture();
        let found = resolve_path(&root, "CN1A/CN2A/CN3A/CN4A/NOPE").unwrap();
        assert!(found.is_empty());
    }

    #[test]
    fn predicates_filter() {
        let root = fixture();
        let found = resolve_path(&root, "*/DOGS[@data >= 2]").unwrap();
        assert_eq!(found.len(), 2);
        let found = resolve_path(&root, "*[position() = 2]/DOGS").unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].as_uint().unwrap(), 2);
        let found = resolve_path(&root, "*[@name = 'KNLC']/DOGS").unwrap();
        assert_eq!(found[0].as_uint().unwrap(), 3);
    }

    #[test]
    fn hex_name_element_matches() {
        let mut root = cont("ROOT");
        root.add_child(ui32("KNLA", 9));
        let found = resolve_path(&root, "0x4B4E4C41").unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].as_uint().unwrap(), 9);
    }

    #[test]
    fn position_counts_within_the_name_group() {
        // two DOGS and one CATS under one parent: position() numbers the
        // DOGS candidates 1 and 2, skipping CATS
        let mut root = cont("ROOT");
        root.add_child(ui32("DOGS", 10));
        root.add_child(ui32("CATS", 20));
        root.add_child(ui32("DOGS", 30));
        let found = resolve_path(&root, "DOGS[position() = 2]").unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].as_uint().unwrap(), 30);
        let found = resolve_path(&root, "DOGS[position() = last()]").unwrap();
        assert_eq!(found[0].as_uint().unwrap(), 30);
    }

    #[test]
    fn predicate_with_hex_literal() {
        let mut root = cont("ROOT");
        root.add_child(ui32("DOGS", 16));
        let found = resolve_path(&root, "DOGS[@data = 0x10]").unwrap();
        assert_eq!(found.len(), 1);
    }

    #[test]
    fn malformed_paths() {
        let root = fixture();
        assert!(matches!(
            resolve_path(&root, "*/DOGS[@data"),
            Err(CodecError::Syntax(_))
        ));
        assert!(matches!(
            resolve_path(&root, "//DOGS"),
            Err(CodecError::Syntax(_))
        ));
        assert!(matches!(
            resolve_path(&root, "TOOLONGNAME/DOGS"),
            Err(CodecError::Syntax(_))
        ));
    }
}
