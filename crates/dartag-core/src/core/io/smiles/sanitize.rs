use std::collections::VecDeque;

use super::error::SmilesError;
use crate::core::models::molecule::Molecule;
use crate::core::models::topology::BondOrder;
use crate::core::utils::elements;

/// Structural checks applied after parsing: aromatic atoms must sit in rings,
/// the aromatic system must admit a Kekulé structure, and no atom may exceed
/// the valence allowed for its element and charge.
pub fn sanitize(mol: &Molecule) -> Result<(), SmilesError> {
    for (index, atom) in mol.atoms() {
        if atom.is_aromatic && !mol.is_in_ring(index) {
            return Err(SmilesError::AromaticOutsideRing { index });
        }
    }

    let pi_bonded = kekulize(mol)?;

    for (index, atom) in mol.atoms() {
        let symbol = atom.symbol();
        let Some(max) = elements::max_valence(symbol) else {
            continue;
        };
        let allowed = allowed_valence(symbol, max, atom.formal_charge);
        let valence = explicit_valence(mol, index) + u32::from(pi_bonded[index]);
        if valence > allowed {
            return Err(SmilesError::Valence {
                index,
                symbol,
                valence,
                allowed,
            });
        }
    }
    Ok(())
}

fn allowed_valence(symbol: &str, max: u8, charge: i8) -> u32 {
    let max = i32::from(max);
    let charge = i32::from(charge);
    let allowed = match symbol {
        "C" | "Si" | "Ge" | "Sn" | "H" => max - charge.abs(),
        "B" => max - charge,
        _ => max + charge,
    };
    allowed.max(0) as u32
}

/// Valence from explicit bonds (aromatic bonds counted once) plus hydrogens.
fn explicit_valence(mol: &Molecule, index: usize) -> u32 {
    let bonds: u32 = mol
        .incident_bonds(index)
        .map(|(_, b)| match b.order {
            BondOrder::Single | BondOrder::Aromatic => 1,
            BondOrder::Double => 2,
            BondOrder::Triple => 3,
        })
        .sum();
    bonds + u32::from(mol.hydrogen_count(index))
}

/// Default valence used to decide whether an aromatic atom still needs a pi bond.
fn target_valence(symbol: &str, charge: i8) -> Option<i32> {
    let base: i32 = match symbol {
        "C" | "Si" => 4,
        "N" | "P" | "As" => 3,
        "O" | "S" | "Se" | "Te" => 2,
        "B" => 3,
        _ => return None,
    };
    let charge = i32::from(charge);
    Some(match symbol {
        "C" | "Si" => base - charge.abs(),
        "B" => base - charge,
        _ => base + charge,
    })
}

/// Assigns one pi bond to every aromatic atom that needs one, using only
/// aromatic bonds between such atoms. Each connected pi system is matched on
/// its own. Returns a per-atom flag of matched atoms.
fn kekulize(mol: &Molecule) -> Result<Vec<bool>, SmilesError> {
    let n = mol.atom_count();
    let mut needs_pi = vec![false; n];
    for (index, atom) in mol.atoms() {
        if !atom.is_aromatic {
            continue;
        }
        let Some(target) = target_valence(atom.symbol(), atom.formal_charge) else {
            continue;
        };
        let used = explicit_valence(mol, index) as i32;
        needs_pi[index] = target - used >= 1;
    }

    let candidates: Vec<Vec<usize>> = (0..n)
        .map(|i| {
            if !needs_pi[i] {
                return Vec::new();
            }
            mol.incident_bonds(i)
                .filter(|(other, bond)| bond.order == BondOrder::Aromatic && needs_pi[*other])
                .map(|(other, _)| other)
                .collect()
        })
        .collect();

    let mut matched = vec![false; n];
    let mut unmatched = Vec::new();
    let mut local = vec![0usize; n];
    for system in pi_systems(&needs_pi, &candidates) {
        for (position, &atom) in system.iter().enumerate() {
            local[atom] = position;
        }
        let adjacency = system
            .iter()
            .map(|&atom| candidates[atom].iter().map(|&other| local[other]).collect())
            .collect();
        let mate = Matching::new(adjacency).maximum();
        for (position, &atom) in system.iter().enumerate() {
            match mate[position] {
                Some(_) => matched[atom] = true,
                None => unmatched.push(atom),
            }
        }
    }

    if !unmatched.is_empty() {
        unmatched.sort_unstable();
        return Err(SmilesError::Kekulization { atoms: unmatched });
    }
    Ok(matched)
}

/// Connected groups of atoms that need a pi bond.
fn pi_systems(needs_pi: &[bool], candidates: &[Vec<usize>]) -> Vec<Vec<usize>> {
    let mut seen = vec![false; needs_pi.len()];
    let mut systems = Vec::new();
    for start in 0..needs_pi.len() {
        if !needs_pi[start] || seen[start] {
            continue;
        }
        seen[start] = true;
        let mut system = vec![start];
        let mut cursor = 0;
        while cursor < system.len() {
            let atom = system[cursor];
            cursor += 1;
            for &other in &candidates[atom] {
                if !seen[other] {
                    seen[other] = true;
                    system.push(other);
                }
            }
        }
        systems.push(system);
    }
    systems
}

/// Maximum matching on a general graph by augmenting paths, contracting odd
/// cycles (blossoms) as they are met.
struct Matching {
    adjacency: Vec<Vec<usize>>,
    mate: Vec<Option<usize>>,
    parent: Vec<Option<usize>>,
    base: Vec<usize>,
    in_tree: Vec<bool>,
    queue: VecDeque<usize>,
}

impl Matching {
    fn new(adjacency: Vec<Vec<usize>>) -> Self {
        let n = adjacency.len();
        Self {
            adjacency,
            mate: vec![None; n],
            parent: vec![None; n],
            base: (0..n).collect(),
            in_tree: vec![false; n],
            queue: VecDeque::new(),
        }
    }

    fn maximum(mut self) -> Vec<Option<usize>> {
        self.seed_greedily();
        // A vertex left without an augmenting path never gains one later.
        for root in 0..self.adjacency.len() {
            if self.mate[root].is_none() {
                if let Some(end) = self.find_augmenting_path(root) {
                    self.flip_path(end);
                }
            }
        }
        self.mate
    }

    fn seed_greedily(&mut self) {
        for v in 0..self.adjacency.len() {
            if self.mate[v].is_some() {
                continue;
            }
            let free = self.adjacency[v]
                .iter()
                .copied()
                .find(|&w| self.mate[w].is_none());
            if let Some(w) = free {
                self.mate[v] = Some(w);
                self.mate[w] = Some(v);
            }
        }
    }

    /// Walks both alternating paths up to their shared blossom base.
    fn common_base(&self, mut a: usize, mut b: usize) -> usize {
        let mut on_path = vec![false; self.adjacency.len()];
        loop {
            a = self.base[a];
            on_path[a] = true;
            match self.mate[a].and_then(|m| self.parent[m]) {
                Some(next) => a = next,
                None => break,
            }
        }
        loop {
            b = self.base[b];
            if on_path[b] {
                return b;
            }
            match self.mate[b].and_then(|m| self.parent[m]) {
                Some(next) => b = next,
                None => return b,
            }
        }
    }

    fn mark_path(&mut self, mut v: usize, base: usize, mut child: usize, blossom: &mut [bool]) {
        while self.base[v] != base {
            let Some(m) = self.mate[v] else {
                break;
            };
            blossom[self.base[v]] = true;
            blossom[self.base[m]] = true;
            self.parent[v] = Some(child);
            child = m;
            match self.parent[m] {
                Some(next) => v = next,
                None => break,
            }
        }
    }

    fn find_augmenting_path(&mut self, root: usize) -> Option<usize> {
        let n = self.adjacency.len();
        self.in_tree.fill(false);
        self.parent.fill(None);
        for (i, base) in self.base.iter_mut().enumerate() {
            *base = i;
        }
        self.queue.clear();
        self.in_tree[root] = true;
        self.queue.push_back(root);

        while let Some(v) = self.queue.pop_front() {
            for k in 0..self.adjacency[v].len() {
                let to = self.adjacency[v][k];
                if self.base[v] == self.base[to] || self.mate[v] == Some(to) {
                    continue;
                }
                let to_is_outer =
                    to == root || self.mate[to].is_some_and(|m| self.parent[m].is_some());
                if to_is_outer {
                    let base = self.common_base(v, to);
                    let mut blossom = vec![false; n];
                    self.mark_path(v, base, to, &mut blossom);
                    self.mark_path(to, base, v, &mut blossom);
                    for i in 0..n {
                        if blossom[self.base[i]] {
                            self.base[i] = base;
                            if !self.in_tree[i] {
                                self.in_tree[i] = true;
                                self.queue.push_back(i);
                            }
                        }
                    }
                } else if self.parent[to].is_none() {
                    self.parent[to] = Some(v);
                    match self.mate[to] {
                        None => return Some(to),
                        Some(m) => {
                            self.in_tree[m] = true;
                            self.queue.push_back(m);
                        }
                    }
                }
            }
        }
        None
    }

    fn flip_path(&mut self, end: usize) {
        let mut next = Some(end);
        while let Some(v) = next {
            let Some(p) = self.parent[v] else {
                break;
            };
            next = self.mate[p];
            self.mate[v] = Some(p);
            self.mate[p] = Some(v);
        }
    }
}
