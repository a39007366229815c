//! Canonical atom ranking.
//!
//! Ranks are seeded from per-atom invariants and refined from neighbour ranks
//! until the partition stops splitting. Remaining ties are broken by trying
//! every atom of the lowest tied class and keeping the trial whose ranked
//! graph trace is smallest, so the result does not depend on input order.

use crate::core::models::atom::MapNumber;
use crate::core::models::molecule::Molecule;
use crate::core::models::topology::BondOrder;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct AtomInvariant {
    degree: usize,
    atomic_number: u8,
    is_aromatic: bool,
    isotope: u16,
    formal_charge: i8,
    hydrogens: u8,
    map_number: MapNumber,
    bond_orders: Vec<BondOrder>,
}

fn atom_invariant(mol: &Molecule, index: usize) -> Option<AtomInvariant> {
    let atom = mol.atom(index)?;
    let mut bond_orders: Vec<BondOrder> = mol.incident_bonds(index).map(|(_, b)| b.order).collect();
    bond_orders.sort_unstable();
    Some(AtomInvariant {
        degree: bond_orders.len(),
        atomic_number: atom.element.atomic_number,
        is_aromatic: atom.is_aromatic,
        isotope: atom.isotope.unwrap_or(0),
        formal_charge: atom.formal_charge,
        hydrogens: mol.hydrogen_count(index),
        map_number: atom.map_number,
        bond_orders,
    })
}

/// Dense ranks (0, 1, 2, ..) of `keys`; equal keys share a rank.
fn ranks_from_keys<K: Ord>(keys: &[K]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..keys.len()).collect();
    order.sort_by(|&a, &b| keys[a].cmp(&keys[b]));
    let mut ranks = vec![0; keys.len()];
    let mut current = 0;
    for pair in order.windows(2) {
        if keys[pair[1]] != keys[pair[0]] {
            current += 1;
        }
        ranks[pair[1]] = current;
    }
    ranks
}

fn class_count(ranks: &[usize]) -> usize {
    ranks.iter().max().map_or(0, |&m| m + 1)
}

/// Neighbour ranks paired with the connecting bond order, sorted.
fn neighbourhood(mol: &Molecule, ranks: &[usize], index: usize) -> Vec<(usize, BondOrder)> {
    let mut around: Vec<(usize, BondOrder)> = mol
        .incident_bonds(index)
        .map(|(other, bond)| (ranks[other], bond.order))
        .collect();
    around.sort_unstable();
    around
}

fn refine(mol: &Molecule, ranks: &mut Vec<usize>) {
    loop {
        let keys: Vec<(usize, Vec<(usize, BondOrder)>)> = (0..ranks.len())
            .map(|i| (ranks[i], neighbourhood(mol, ranks, i)))
            .collect();
        let refined = ranks_from_keys(&keys);
        if class_count(&refined) == class_count(ranks) {
            return;
        }
        *ranks = refined;
    }
}

type Trace<'a> = Vec<(&'a AtomInvariant, Vec<(usize, BondOrder)>)>;

fn trace<'a>(mol: &Molecule, ranks: &[usize], invariants: &'a [AtomInvariant]) -> Trace<'a> {
    let mut order: Vec<usize> = (0..ranks.len()).collect();
    order.sort_by_key(|&i| ranks[i]);
    order
        .into_iter()
        .map(|i| (&invariants[i], neighbourhood(mol, ranks, i)))
        .collect()
}

/// Canonical rank of every atom: a permutation of `0..atom_count`.
///
/// Atoms related by a symmetry of the molecule end up in an order that yields
/// the same written string whichever of them is picked first. Tetrahedral
/// marks do not take part in the ranking.
pub fn canonical_ranks(mol: &Molecule) -> Vec<usize> {
    let invariants: Vec<AtomInvariant> = (0..mol.atom_count())
        .filter_map(|i| atom_invariant(mol, i))
        .collect();
    if invariants.len() != mol.atom_count() {
        return (0..mol.atom_count()).collect();
    }

    let mut ranks = ranks_from_keys(&invariants);
    refine(mol, &mut ranks);

    while class_count(&ranks) < ranks.len() {
        let Some(tied) = lowest_tied_rank(&ranks) else {
            break;
        };
        let mut best: Option<(Trace<'_>, Vec<usize>)> = None;
        for candidate in (0..ranks.len()).filter(|&i| ranks[i] == tied) {
            let keys: Vec<(usize, bool)> = (0..ranks.len())
                .map(|i| (ranks[i], i != candidate))
                .collect();
            let mut trial = ranks_from_keys(&keys);
            refine(mol, &mut trial);
            let trial_trace = trace(mol, &trial, &invariants);
            if best.as_ref().is_none_or(|(t, _)| trial_trace < *t) {
                best = Some((trial_trace, trial));
            }
        }
        match best {
            Some((_, chosen)) => ranks = chosen,
            None => break,
        }
    }
    ranks
}

fn lowest_tied_rank(ranks: &[usize]) -> Option<usize> {
    let mut counts = vec![0usize; class_count(ranks)];
    for &r in ranks {
        counts[r] += 1;
    }
    counts.iter().position(|&c| c > 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::io::smiles::parser::build_molecule;
    use crate::core::io::smiles::tokenizer::tokenize;

    fn ranks_of(smiles: &str) -> Vec<usize> {
        canonical_ranks(&build_molecule(&tokenize(smiles).unwrap()).unwrap())
    }

    fn is_permutation(ranks: &[usize]) -> bool {
        let mut sorted = ranks.to_vec();
        sorted.sort_unstable();
        sorted == (0..ranks.len()).collect::<Vec<_>>()
    }

    #[test]
    fn ranks_form_a_total_order() {
        for smiles in ["C", "CCO", "c1ccccc1", "CC(C)(C)C", "C1CC2CCC1CC2", "[Na+].[Cl-]"] {
            assert!(is_permutation(&ranks_of(smiles)), "{smiles}");
        }
    }

    #[test]
    fn ranking_follows_atoms_not_positions() {
        // Ethanol written from either end: the oxygen keeps its rank.
        let forward = ranks_of("CCO");
        let backward = ranks_of("OCC");
        assert_eq!(forward[2], backward[0]);
        assert_eq!(forward[0], backward[2]);
    }

    #[test]
    fn terminal_atoms_rank_before_branch_points() {
        let ranks = ranks_of("CC(C)O");
        assert!(ranks[0] < ranks[1]);
        assert!(ranks[2] < ranks[1]);
    }

    #[test]
    fn map_numbers_separate_otherwise_equal_atoms() {
        let ranks = ranks_of("[CH4:2].[CH4:1]");
        assert!(ranks[1] < ranks[0]);
    }
}
