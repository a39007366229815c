use super::canonical::canonical_ranks;
use crate::core::models::atom::{Atom, Chirality};
use crate::core::models::molecule::{Molecule, StereoNeighbour};
use crate::core::models::topology::{BondDirection, BondOrder};
use crate::core::utils::elements;
use std::collections::{BTreeMap, BTreeSet};

/// Writes a molecule as SMILES. Each connected component is written depth-first
/// from its lowest-indexed atom, visiting neighbours in ascending index order,
/// so atoms appear in the order they were parsed wherever the graph allows.
pub fn write_smiles(mol: &Molecule) -> String {
    let priority: Vec<usize> = (0..mol.atom_count()).collect();
    mol.components()
        .iter()
        .filter_map(|component| component.first())
        .map(|&start| write_component(mol, start, &priority))
        .collect::<Vec<_>>()
        .join(".")
}

/// Writes a molecule as canonical SMILES: the traversal follows canonical
/// atom ranks and components are sorted, so any spelling of the same
/// molecule gives the same string.
pub fn write_canonical_smiles(mol: &Molecule) -> String {
    let ranks = canonical_ranks(mol);
    let mut parts: Vec<String> = mol
        .components()
        .iter()
        .filter_map(|component| component.iter().copied().min_by_key(|&i| ranks[i]))
        .map(|start| write_component(mol, start, &ranks))
        .collect();
    parts.sort_unstable();
    parts.join(".")
}

struct Traversal {
    parent: Vec<Option<usize>>,
    children: Vec<Vec<usize>>,
    /// Ring bonds opened at an atom, keyed by the partner that closes them later.
    ring_opens: Vec<Vec<usize>>,
    /// Ring bonds closed at an atom, keyed by the partner that opened them.
    ring_closes: Vec<Vec<usize>>,
}

/// Depth-first spanning tree from `start`; lower `priority` neighbours are visited first.
fn traverse(mol: &Molecule, start: usize, priority: &[usize]) -> Traversal {
    let n = mol.atom_count();
    let mut rank: Vec<Option<usize>> = vec![None; n];
    let mut parent = vec![None; n];
    let mut children: Vec<Vec<usize>> = vec![Vec::new(); n];
    let mut ring_opens: Vec<Vec<usize>> = vec![Vec::new(); n];
    let mut ring_closes: Vec<Vec<usize>> = vec![Vec::new(); n];

    let mut visit_count = 0;
    rank[start] = Some(visit_count);
    let ordered = |index: usize| {
        let mut neighbours = mol.neighbours(index);
        neighbours.sort_by_key(|&n| priority[n]);
        neighbours
    };
    let mut stack: Vec<(usize, Vec<usize>, usize)> = vec![(start, ordered(start), 0)];

    while let Some((node, neighbours, cursor)) = stack.last_mut() {
        let node = *node;
        let Some(&next) = neighbours.get(*cursor) else {
            stack.pop();
            continue;
        };
        *cursor += 1;

        match rank[next] {
            None => {
                visit_count += 1;
                rank[next] = Some(visit_count);
                parent[next] = Some(node);
                children[node].push(next);
                stack.push((next, ordered(next), 0));
            }
            Some(next_rank) => {
                let is_ancestor = rank[node].is_some_and(|r| next_rank < r);
                if parent[node] != Some(next) && is_ancestor {
                    ring_closes[node].push(next);
                    ring_opens[next].push(node);
                }
            }
        }
    }

    for opens in &mut ring_opens {
        opens.sort_by_key(|&partner| rank[partner]);
    }

    Traversal {
        parent,
        children,
        ring_opens,
        ring_closes,
    }
}

enum Emit {
    Atom(usize),
    Text(&'static str),
}

fn write_component(mol: &Molecule, start: usize, priority: &[usize]) -> String {
    let traversal = traverse(mol, start, priority);
    let mut out = String::new();
    let mut in_use: BTreeSet<u16> = BTreeSet::new();
    let mut open_digits: BTreeMap<(usize, usize), u16> = BTreeMap::new();
    let mut stack = vec![Emit::Atom(start)];

    while let Some(item) = stack.pop() {
        let index = match item {
            Emit::Text(text) => {
                out.push_str(text);
                continue;
            }
            Emit::Atom(index) => index,
        };

        let from = traversal.parent[index];
        if let Some(parent) = from {
            out.push_str(&bond_symbol(mol, parent, index));
        }

        let mut ring_text = String::new();
        let mut ring_partners = Vec::new();
        let mut released = Vec::new();
        for &partner in &traversal.ring_closes[index] {
            if let Some(digit) = open_digits.remove(&(partner, index)) {
                ring_text.push_str(&bond_symbol(mol, index, partner));
                ring_text.push_str(&digit_text(digit));
                ring_partners.push(partner);
                released.push(digit);
            }
        }
        for &partner in &traversal.ring_opens[index] {
            let digit = lowest_free_digit(&in_use);
            in_use.insert(digit);
            open_digits.insert((index, partner), digit);
            ring_text.push_str(&digit_text(digit));
            ring_partners.push(partner);
        }
        for digit in released {
            in_use.remove(&digit);
        }

        let children = &traversal.children[index];
        out.push_str(&atom_text(mol, index, from, &ring_partners, children));
        out.push_str(&ring_text);

        for (position, &child) in children.iter().enumerate().rev() {
            if position + 1 == children.len() {
                stack.push(Emit::Atom(child));
            } else {
                stack.push(Emit::Text(")"));
                stack.push(Emit::Atom(child));
                stack.push(Emit::Text("("));
            }
        }
    }

    out
}

fn lowest_free_digit(in_use: &BTreeSet<u16>) -> u16 {
    (1..).find(|d| !in_use.contains(d)).unwrap_or(1)
}

fn digit_text(digit: u16) -> String {
    if digit < 10 {
        digit.to_string()
    } else {
        format!("%{digit}")
    }
}

fn bond_symbol(mol: &Molecule, from: usize, to: usize) -> String {
    let Some(bond) = mol.bond_between(from, to) else {
        return String::new();
    };
    let aromatic = |i: usize| mol.atom(i).is_some_and(|a| a.is_aromatic);
    let both_aromatic = aromatic(from) && aromatic(to);
    let symbol = match bond.order {
        BondOrder::Single => match bond.direction {
            Some(direction) => {
                let written = if from < to {
                    direction
                } else {
                    direction.reversed()
                };
                match written {
                    BondDirection::Up => "/",
                    BondDirection::Down => "\\",
                }
            }
            None if both_aromatic => "-",
            None => "",
        },
        BondOrder::Double => "=",
        BondOrder::Triple => "#",
        BondOrder::Aromatic if both_aromatic => "",
        BondOrder::Aromatic => ":",
    };
    symbol.to_string()
}

fn atom_text(
    mol: &Molecule,
    index: usize,
    from: Option<usize>,
    ring_partners: &[usize],
    children: &[usize],
) -> String {
    let Some(atom) = mol.atom(index) else {
        return String::new();
    };
    if !needs_brackets(mol, index, atom) {
        return symbol_text(atom);
    }

    let hydrogens = mol.hydrogen_count(index);
    let chirality = if atom.chirality.is_chiral() {
        output_chirality(mol, index, atom.chirality, from, hydrogens, ring_partners, children)
    } else {
        Chirality::None
    };

    let mut text = String::from("[");
    if let Some(isotope) = atom.isotope {
        text.push_str(&isotope.to_string());
    }
    text.push_str(&symbol_text(atom));
    match chirality {
        Chirality::CounterClockwise => text.push('@'),
        Chirality::Clockwise => text.push_str("@@"),
        Chirality::None => {}
    }
    match hydrogens {
        0 => {}
        1 => text.push('H'),
        h => text.push_str(&format!("H{h}")),
    }
    match atom.formal_charge {
        0 => {}
        1 => text.push('+'),
        -1 => text.push('-'),
        c if c > 0 => text.push_str(&format!("+{c}")),
        c => text.push_str(&format!("-{}", -i16::from(c))),
    }
    if atom.map_number != 0 {
        text.push_str(&format!(":{}", atom.map_number));
    }
    text.push(']');
    text
}

fn symbol_text(atom: &Atom) -> String {
    if atom.is_aromatic {
        atom.symbol().to_ascii_lowercase()
    } else {
        atom.symbol().to_string()
    }
}

fn needs_brackets(mol: &Molecule, index: usize, atom: &Atom) -> bool {
    let symbol = atom.symbol();
    if symbol == "*" {
        return atom.formal_charge != 0
            || atom.isotope.is_some()
            || atom.map_number != 0
            || atom.explicit_hydrogens.is_some_and(|h| h > 0);
    }
    let bare_form = if atom.is_aromatic {
        matches!(symbol, "B" | "C" | "N" | "O" | "P" | "S")
    } else {
        elements::is_organic_subset(symbol)
    };
    !bare_form
        || atom.formal_charge != 0
        || atom.isotope.is_some()
        || atom.chirality.is_chiral()
        || atom.map_number != 0
        || atom
            .explicit_hydrogens
            .is_some_and(|h| h != mol.implicit_hydrogens(index))
}

/// Re-expresses a tetrahedral mark for the neighbour order in which the atom
/// is written: preceding atom, hydrogen, ring-closure partners, then branches.
fn output_chirality(
    mol: &Molecule,
    index: usize,
    chirality: Chirality,
    from: Option<usize>,
    hydrogens: u8,
    ring_partners: &[usize],
    children: &[usize],
) -> Chirality {
    let Some(input) = mol.stereo_neighbours(index) else {
        return chirality;
    };

    let mut output: Vec<StereoNeighbour> = Vec::with_capacity(input.len());
    if let Some(parent) = from {
        output.push(StereoNeighbour::Atom(parent));
    }
    if hydrogens > 0 {
        output.push(StereoNeighbour::ImplicitHydrogen);
    }
    output.extend(ring_partners.iter().map(|&p| StereoNeighbour::Atom(p)));
    output.extend(children.iter().map(|&c| StereoNeighbour::Atom(c)));

    match permutation_is_odd(input, &output) {
        Some(true) => chirality.inverted(),
        _ => chirality,
    }
}

/// Parity of the permutation taking `from` to `to`; `None` when they do not
/// hold the same neighbours.
fn permutation_is_odd(from: &[StereoNeighbour], to: &[StereoNeighbour]) -> Option<bool> {
    if from.len() != to.len() {
        return None;
    }
    let positions: Vec<usize> = to
        .iter()
        .map(|slot| from.iter().position(|f| f == slot))
        .collect::<Option<_>>()?;
    let mut inversions = 0;
    for i in 0..positions.len() {
        for j in i + 1..positions.len() {
            if positions[i] > positions[j] {
                inversions += 1;
            }
        }
    }
    Some(inversions % 2 == 1)
}
