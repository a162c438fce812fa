use anyhow::Result;

use ade_rs::Atom;

/// Print the structure without values: one `NAME:TYPE` per line, indented,
/// with a child count on containers.
pub fn tree(atoms: &[Atom]) -> Result<()> {
    for atom in atoms {
        print_atom(atom, 0);
    }
    Ok(())
}

fn print_atom(atom: &Atom, depth: usize) {
    let indent = "  ".repeat(depth);
    if atom.is_container() {
        println!(
            "{indent}{}:{} ({} children)",
            atom.name(),
            atom.tag(),
            atom.children_count()
        );
        for child in atom.children() {
            print_atom(child, depth + 1);
        }
    } else {
        println!(
            "{indent}{}:{} ({} bytes)",
            atom.name(),
            atom.tag(),
            atom.data().len()
        );
    }
}
