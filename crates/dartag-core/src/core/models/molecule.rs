use super::atom::{Atom, MapNumber};
use super::topology::{Bond, BondOrder};
use crate::core::utils::elements;
use petgraph::graph::{EdgeIndex, NodeIndex, UnGraph};
use petgraph::unionfind::UnionFind;
use petgraph::visit::EdgeRef;
use std::collections::{BTreeMap, VecDeque};

/// One slot in the neighbour order a chirality mark refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StereoNeighbour {
    Atom(usize),
    ImplicitHydrogen,
}

/// An atom/bond graph with optional atom-map numbers.
///
/// Atoms are addressed by their positional index, which is the order in which
/// they were added (for parsed molecules, the order of appearance in the input).
#[derive(Debug, Clone, Default)]
pub struct Molecule {
    graph: UnGraph<Atom, Bond>,
    stereo: BTreeMap<usize, Vec<StereoNeighbour>>,
}

impl Molecule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_atom(&mut self, atom: Atom) -> usize {
        self.graph.add_node(atom).index()
    }

    /// Adds a bond between `a` and `b`, replacing any existing bond between them.
    pub fn add_bond(&mut self, a: usize, b: usize, bond: Bond) -> usize {
        self.graph
            .update_edge(NodeIndex::new(a), NodeIndex::new(b), bond)
            .index()
    }

    #[inline]
    pub fn atom_count(&self) -> usize {
        self.graph.node_count()
    }

    #[inline]
    pub fn bond_count(&self) -> usize {
        self.graph.edge_count()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    pub fn atom(&self, index: usize) -> Option<&Atom> {
        self.graph.node_weight(NodeIndex::new(index))
    }

    pub fn atom_mut(&mut self, index: usize) -> Option<&mut Atom> {
        self.graph.node_weight_mut(NodeIndex::new(index))
    }

    pub fn atoms(&self) -> impl Iterator<Item = (usize, &Atom)> {
        self.graph
            .node_indices()
            .map(move |n| (n.index(), &self.graph[n]))
    }

    /// All bonds as `(a, b, bond)` with `a < b`.
    pub fn bonds(&self) -> impl Iterator<Item = (usize, usize, &Bond)> {
        self.graph.edge_references().map(|e| {
            let (a, b) = (e.source().index(), e.target().index());
            (a.min(b), a.max(b), e.weight())
        })
    }

    pub fn bond_between(&self, a: usize, b: usize) -> Option<&Bond> {
        self.find_edge(a, b).map(|e| &self.graph[e])
    }

    pub fn bond_between_mut(&mut self, a: usize, b: usize) -> Option<&mut Bond> {
        self.find_edge(a, b).map(move |e| &mut self.graph[e])
    }

    fn find_edge(&self, a: usize, b: usize) -> Option<EdgeIndex> {
        if a >= self.atom_count() || b >= self.atom_count() {
            return None;
        }
        self.graph.find_edge(NodeIndex::new(a), NodeIndex::new(b))
    }

    /// Bonds incident to `index`, as `(other endpoint, bond)`, in no particular order.
    pub fn incident_bonds(&self, index: usize) -> impl Iterator<Item = (usize, &Bond)> {
        let node = NodeIndex::new(index);
        self.graph.edges(node).map(move |e| {
            let other = if e.source() == node {
                e.target()
            } else {
                e.source()
            };
            (other.index(), e.weight())
        })
    }

    /// Neighbours of `index` in ascending index order.
    pub fn neighbours(&self, index: usize) -> Vec<usize> {
        let mut neighbours: Vec<usize> = self.incident_bonds(index).map(|(n, _)| n).collect();
        neighbours.sort_unstable();
        neighbours
    }

    pub fn degree(&self, index: usize) -> usize {
        self.incident_bonds(index).count()
    }

    /// Map number of the atom at `index`; 0 for unmapped or out-of-range atoms.
    pub fn map_number(&self, index: usize) -> MapNumber {
        self.atom(index).map_or(0, |a| a.map_number)
    }

    pub fn set_map_number(&mut self, index: usize, map_number: MapNumber) {
        if let Some(atom) = self.atom_mut(index) {
            atom.map_number = map_number;
        }
    }

    pub fn clear_map_numbers(&mut self) {
        for atom in self.graph.node_weights_mut() {
            atom.map_number = 0;
        }
    }

    /// Positional indices of atoms carrying a nonzero map number, ascending.
    pub fn mapped_atom_indices(&self) -> Vec<usize> {
        self.atoms()
            .filter(|(_, a)| a.is_mapped())
            .map(|(i, _)| i)
            .collect()
    }

    pub fn stereo_neighbours(&self, index: usize) -> Option<&[StereoNeighbour]> {
        self.stereo.get(&index).map(Vec::as_slice)
    }

    pub fn set_stereo_neighbours(&mut self, index: usize, order: Vec<StereoNeighbour>) {
        self.stereo.insert(index, order);
    }

    /// Hydrogens carried by the atom: the bracket count, or the implicit count
    /// derived from the organic-subset valences for bare atoms.
    pub fn hydrogen_count(&self, index: usize) -> u8 {
        match self.atom(index) {
            Some(atom) => match atom.explicit_hydrogens {
                Some(h) => h,
                None => self.implicit_hydrogens(index),
            },
            None => 0,
        }
    }

    /// Implicit hydrogens a bare atom at `index` would receive.
    ///
    /// Aromatic bonds count as single bonds; aromatic carbon and boron, and
    /// two-connected aromatic nitrogen and phosphorus, contribute one extra
    /// valence for their pi bond.
    pub fn implicit_hydrogens(&self, index: usize) -> u8 {
        let Some(atom) = self.atom(index) else {
            return 0;
        };
        let mut valence: u32 = self
            .incident_bonds(index)
            .map(|(_, b)| match b.order {
                BondOrder::Aromatic => 1,
                other => u32::from(other.doubled_valence() / 2),
            })
            .sum();
        if atom.is_aromatic && self.contributes_pi_bond(index) {
            valence += 1;
        }
        elements::implicit_hydrogens(atom.symbol(), valence.min(u8::MAX as u32) as u8)
    }

    fn contributes_pi_bond(&self, index: usize) -> bool {
        let Some(atom) = self.atom(index) else {
            return false;
        };
        match atom.symbol() {
            "C" | "B" => true,
            "N" | "P" => self.degree(index) == 2,
            _ => false,
        }
    }

    /// Connected components, each sorted ascending, ordered by their lowest index.
    pub fn components(&self) -> Vec<Vec<usize>> {
        let mut sets = UnionFind::<usize>::new(self.atom_count());
        for (a, b, _) in self.bonds() {
            sets.union(a, b);
        }
        let mut grouped: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
        let mut root_to_first: BTreeMap<usize, usize> = BTreeMap::new();
        for index in 0..self.atom_count() {
            let root = sets.find(index);
            let first = *root_to_first.entry(root).or_insert(index);
            grouped.entry(first).or_default().push(index);
        }
        grouped.into_values().collect()
    }

    /// Whether `index` lies on at least one cycle.
    pub fn is_in_ring(&self, index: usize) -> bool {
        self.neighbours(index)
            .into_iter()
            .any(|n| self.connected_without_bond(index, n))
    }

    fn connected_without_bond(&self, from: usize, to: usize) -> bool {
        let mut seen = vec![false; self.atom_count()];
        let mut queue = VecDeque::from([from]);
        seen[from] = true;
        while let Some(current) = queue.pop_front() {
            for (next, _) in self.incident_bonds(current) {
                if current == from && next == to {
                    continue;
                }
                if next == to {
                    return true;
                }
                if !seen[next] {
                    seen[next] = true;
                    queue.push_back(next);
                }
            }
        }
        false
    }

    /// Copies the given atoms (and the bonds among them) into a new molecule,
    /// preserving their relative order.
    pub fn extract(&self, indices: &[usize]) -> Molecule {
        let mut sorted = indices.to_vec();
        sorted.sort_unstable();
        sorted.dedup();

        let mut remap = vec![None; self.atom_count()];
        let mut fragment = Molecule::new();
        for &old in &sorted {
            if let Some(atom) = self.atom(old) {
                remap[old] = Some(fragment.add_atom(atom.clone()));
            }
        }
        for (a, b, bond) in self.bonds() {
            if let (Some(na), Some(nb)) = (remap[a], remap[b]) {
                fragment.add_bond(na, nb, *bond);
            }
        }
        for (&old, order) in &self.stereo {
            let Some(new) = remap.get(old).copied().flatten() else {
                continue;
            };
            let translated: Option<Vec<StereoNeighbour>> = order
                .iter()
                .map(|slot| match slot {
                    StereoNeighbour::Atom(n) => remap
                        .get(*n)
                        .copied()
                        .flatten()
                        .map(StereoNeighbour::Atom),
                    StereoNeighbour::ImplicitHydrogen => Some(StereoNeighbour::ImplicitHydrogen),
                })
                .collect();
            if let Some(translated) = translated {
                fragment.set_stereo_neighbours(new, translated);
            }
        }
        fragment
    }
}
