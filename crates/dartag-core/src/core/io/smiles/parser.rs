use super::error::SmilesError;
use super::tokenizer::{AtomToken, BondToken, Token};
use crate::core::models::atom::Atom;
use crate::core::models::molecule::{Molecule, StereoNeighbour};
use crate::core::models::topology::{Bond, BondDirection, BondOrder};
use std::collections::BTreeMap;

struct RingOpen {
    atom: usize,
    bond: Option<BondToken>,
    slot: usize,
}

/// Builds a molecule from a token stream. Atom indices follow order of appearance.
pub fn build_molecule(tokens: &[Token]) -> Result<Molecule, SmilesError> {
    let mut mol = Molecule::new();
    // Neighbour order as written, with placeholders for ring bonds not yet closed.
    let mut written_order: Vec<Vec<Option<usize>>> = Vec::new();
    let mut has_preceding: Vec<bool> = Vec::new();
    let mut chiral_atoms: Vec<(usize, u8)> = Vec::new();

    let mut branches: Vec<usize> = Vec::new();
    let mut current: Option<usize> = None;
    let mut pending: Option<(BondToken, usize)> = None;
    let mut ring_opens: BTreeMap<u16, RingOpen> = BTreeMap::new();

    for token in tokens {
        match token {
            Token::Atom(atom_token) => {
                let idx = mol.add_atom(atom_from_token(atom_token));
                written_order.push(Vec::new());
                has_preceding.push(false);
                if atom_token.chirality.is_chiral() {
                    chiral_atoms.push((idx, atom_token.hcount.unwrap_or(0)));
                }

                match current {
                    Some(prev) => {
                        let bond_token = pending.take().map(|(b, _)| b);
                        let bond = resolve_bond(&mol, bond_token, prev, idx);
                        mol.add_bond(prev, idx, bond);
                        written_order[prev].push(Some(idx));
                        written_order[idx].push(Some(prev));
                        has_preceding[idx] = true;
                    }
                    None => {
                        if let Some((_, pos)) = pending {
                            return Err(SmilesError::DanglingBond { pos });
                        }
                    }
                }
                current = Some(idx);
            }
            Token::Bond { bond, pos } => {
                if current.is_none() || pending.is_some() {
                    return Err(SmilesError::DanglingBond { pos: *pos });
                }
                pending = Some((*bond, *pos));
            }
            Token::RingClosure { digit, pos } => {
                let cur = current.ok_or(SmilesError::DanglingRingClosure {
                    digit: *digit,
                    pos: *pos,
                })?;
                let written = pending.take().map(|(b, _)| b);

                match ring_opens.remove(digit) {
                    Some(open) => {
                        if open.atom == cur || mol.bond_between(open.atom, cur).is_some() {
                            return Err(SmilesError::InvalidRingBond { digit: *digit });
                        }
                        // A direction written at the closing digit points from the
                        // later atom, so it is stored reversed.
                        let closing = written.map(reverse_direction);
                        let bond_token = match (open.bond, closing) {
                            (None, None) => None,
                            (Some(b), None) | (None, Some(b)) => Some(b),
                            (Some(a), Some(b)) if a == b => Some(a),
                            _ => return Err(SmilesError::RingBondConflict { digit: *digit }),
                        };
                        let bond = resolve_bond(&mol, bond_token, open.atom, cur);
                        mol.add_bond(open.atom, cur, bond);
                        written_order[open.atom][open.slot] = Some(cur);
                        written_order[cur].push(Some(open.atom));
                    }
                    None => {
                        let slot = written_order[cur].len();
                        written_order[cur].push(None);
                        ring_opens.insert(
                            *digit,
                            RingOpen {
                                atom: cur,
                                bond: written,
                                slot,
                            },
                        );
                    }
                }
            }
            Token::OpenParen(pos) => {
                let cur = current.ok_or(SmilesError::UnmatchedParen { pos: *pos })?;
                if let Some((_, bond_pos)) = pending {
                    return Err(SmilesError::DanglingBond { pos: bond_pos });
                }
                branches.push(cur);
            }
            Token::CloseParen(pos) => {
                if let Some((_, bond_pos)) = pending {
                    return Err(SmilesError::DanglingBond { pos: bond_pos });
                }
                current = Some(branches.pop().ok_or(SmilesError::UnmatchedParen { pos: *pos })?);
            }
            Token::Dot(_) => {
                if let Some((_, bond_pos)) = pending {
                    return Err(SmilesError::DanglingBond { pos: bond_pos });
                }
                current = None;
            }
        }
    }

    if let Some((_, pos)) = pending {
        return Err(SmilesError::DanglingBond { pos });
    }
    if !branches.is_empty() {
        let pos = tokens
            .iter()
            .rev()
            .find_map(|t| match t {
                Token::OpenParen(pos) => Some(*pos),
                _ => None,
            })
            .unwrap_or(0);
        return Err(SmilesError::UnmatchedParen { pos });
    }
    if let Some(&digit) = ring_opens.keys().next() {
        return Err(SmilesError::UnclosedRing { digit });
    }

    for (idx, hcount) in chiral_atoms {
        let mut order: Vec<StereoNeighbour> = Vec::with_capacity(written_order[idx].len() + 1);
        let mut neighbours = written_order[idx].iter().flatten().copied();
        if has_preceding[idx] {
            if let Some(first) = neighbours.next() {
                order.push(StereoNeighbour::Atom(first));
            }
        }
        if hcount > 0 {
            order.push(StereoNeighbour::ImplicitHydrogen);
        }
        order.extend(neighbours.map(StereoNeighbour::Atom));
        mol.set_stereo_neighbours(idx, order);
    }

    Ok(mol)
}

fn atom_from_token(token: &AtomToken) -> Atom {
    Atom {
        element: token.element,
        is_aromatic: token.is_aromatic,
        isotope: token.isotope,
        chirality: token.chirality,
        explicit_hydrogens: token.hcount,
        formal_charge: token.charge,
        map_number: token.atom_class,
    }
}

fn reverse_direction(bond: BondToken) -> BondToken {
    match bond {
        BondToken::Up => BondToken::Down,
        BondToken::Down => BondToken::Up,
        other => other,
    }
}

fn resolve_bond(mol: &Molecule, token: Option<BondToken>, from: usize, to: usize) -> Bond {
    // Directions are stored relative to the lower-indexed endpoint.
    let oriented = |direction: BondDirection| {
        if from < to {
            direction
        } else {
            direction.reversed()
        }
    };
    match token {
        Some(BondToken::Single) => Bond::new(BondOrder::Single),
        Some(BondToken::Double) => Bond::new(BondOrder::Double),
        Some(BondToken::Triple) => Bond::new(BondOrder::Triple),
        Some(BondToken::Aromatic) => Bond::new(BondOrder::Aromatic),
        Some(BondToken::Up) => Bond::directional(oriented(BondDirection::Up)),
        Some(BondToken::Down) => Bond::directional(oriented(BondDirection::Down)),
        None => {
            let aromatic = |i: usize| mol.atom(i).is_some_and(|a| a.is_aromatic);
            if aromatic(from) && aromatic(to) {
                Bond::new(BondOrder::Aromatic)
            } else {
                Bond::new(BondOrder::Single)
            }
        }
    }
}
