use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use tracing::warn;

use super::error::EngineError;
use crate::core::io::traits::{MolecularNotation, Sanitization};
use crate::core::models::atom::MapNumber;
use crate::core::models::molecule::Molecule;
use crate::core::models::topology::BondOrder;

/// Map number -> sorted bond descriptors of every bond incident to that atom.
pub type Neighbourhoods = BTreeMap<MapNumber, Vec<String>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AtomEnvironment {
    Changed,
    Same,
}

impl FromStr for AtomEnvironment {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "changed" => Ok(Self::Changed),
            "same" => Ok(Self::Same),
            _ => Err(EngineError::InvalidArgument(format!(
                "unrecognised atom environment '{}': use 'changed' or 'same'",
                s
            ))),
        }
    }
}

impl fmt::Display for AtomEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Changed => f.write_str("changed"),
            Self::Same => f.write_str("same"),
        }
    }
}

/// `"{lo}_{hi}_{ORDER}"` for a bond between atoms carrying map numbers `a` and `b`.
pub fn bond_descriptor(a: MapNumber, b: MapNumber, order: BondOrder) -> String {
    format!("{}_{}_{}", a.min(b), a.max(b), order.as_str())
}

/// Neighbourhoods of an already parsed molecule.
///
/// Atoms with map number 0 are never keys, but still appear as the `0` endpoint
/// in their mapped neighbours' descriptors. A mapped atom without bonds has no
/// entry, and when two atoms share a map number the later one wins.
pub fn neighbourhoods_of(molecule: &Molecule) -> Neighbourhoods {
    let mut neighbourhoods = Neighbourhoods::new();
    for (index, atom) in molecule.atoms() {
        if !atom.is_mapped() {
            continue;
        }
        let mut descriptors: Vec<String> = molecule
            .incident_bonds(index)
            .map(|(other, bond)| {
                bond_descriptor(atom.map_number, molecule.map_number(other), bond.order)
            })
            .collect();
        if descriptors.is_empty() {
            continue;
        }
        descriptors.sort();
        neighbourhoods.insert(atom.map_number, descriptors);
    }
    neighbourhoods
}

/// Parses `notation` without sanitization and extracts its neighbourhoods.
pub fn try_atomic_neighbourhoods<N: MolecularNotation>(
    notation: &N,
    smiles: &str,
) -> Result<Neighbourhoods, EngineError> {
    let molecule = notation
        .parse(smiles, Sanitization::Skip)
        .map_err(|e| EngineError::parse(smiles, e))?;
    Ok(neighbourhoods_of(&molecule))
}

/// Like [`try_atomic_neighbourhoods`], but an unparseable string yields an
/// empty mapping.
pub fn atomic_neighbourhoods<N: MolecularNotation>(notation: &N, smiles: &str) -> Neighbourhoods {
    try_atomic_neighbourhoods(notation, smiles).unwrap_or_else(|e| {
        warn!("Could not extract atomic neighbourhoods: {}", e);
        Neighbourhoods::new()
    })
}

/// Both halves of the CHANGED / SAME partition, ascending.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AtomClassification {
    pub changed: Vec<MapNumber>,
    pub same: Vec<MapNumber>,
}

impl AtomClassification {
    pub fn from_neighbourhoods(precursors: &Neighbourhoods, products: &Neighbourhoods) -> Self {
        let empty: &[String] = &[];
        let mut classification = Self::default();
        for key in union_of_keys(precursors, products) {
            let before = precursors.get(&key).map_or(empty, Vec::as_slice);
            let after = products.get(&key).map_or(empty, Vec::as_slice);
            if before == after {
                classification.same.push(key);
            } else {
                classification.changed.push(key);
            }
        }
        classification
    }

    pub fn get(&self, kind: AtomEnvironment) -> &[MapNumber] {
        match kind {
            AtomEnvironment::Changed => &self.changed,
            AtomEnvironment::Same => &self.same,
        }
    }

    pub fn into_list(self, kind: AtomEnvironment) -> Vec<MapNumber> {
        match kind {
            AtomEnvironment::Changed => self.changed,
            AtomEnvironment::Same => self.same,
        }
    }
}

fn union_of_keys(a: &Neighbourhoods, b: &Neighbourhoods) -> BTreeSet<MapNumber> {
    a.keys().chain(b.keys()).copied().collect()
}

pub fn classify<N: MolecularNotation>(
    notation: &N,
    precursors: &str,
    products: &str,
) -> AtomClassification {
    AtomClassification::from_neighbourhoods(
        &atomic_neighbourhoods(notation, precursors),
        &atomic_neighbourhoods(notation, products),
    )
}

/// Every map number keyed on either side.
pub fn all_atom_indices<N: MolecularNotation>(
    notation: &N,
    precursors: &str,
    products: &str,
) -> BTreeSet<MapNumber> {
    union_of_keys(
        &atomic_neighbourhoods(notation, precursors),
        &atomic_neighbourhoods(notation, products),
    )
}

pub fn atom_list<N: MolecularNotation>(
    notation: &N,
    precursors: &str,
    products: &str,
    kind: AtomEnvironment,
) -> Vec<MapNumber> {
    classify(notation, precursors, products).into_list(kind)
}

/// [`atom_list`] with the kind given by name (`"changed"` or `"same"`).
pub fn atom_list_by_name<N: MolecularNotation>(
    notation: &N,
    precursors: &str,
    products: &str,
    kind: &str,
) -> Result<Vec<MapNumber>, EngineError> {
    let kind: AtomEnvironment = kind.parse()?;
    Ok(atom_list(notation, precursors, products, kind))
}

pub fn changed<N: MolecularNotation>(notation: &N, precursors: &str, products: &str) -> Vec<MapNumber> {
    atom_list(notation, precursors, products, AtomEnvironment::Changed)
}

pub fn same<N: MolecularNotation>(notation: &N, precursors: &str, products: &str) -> Vec<MapNumber> {
    atom_list(notation, precursors, products, AtomEnvironment::Same)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::io::smiles::Smiles;

    fn split(rxn: &str) -> (&str, &str) {
        rxn.split_once(">>").unwrap()
    }

    const HALOGENATION: &str = "O=P(Cl)(Cl)[Cl:12].O[c:11]1[c:6]([C:4]([O:3][CH2:2][CH3:1])=[O:5])[cH:7][n:8][c:9]2[c:10]1[CH2:13][CH2:14][CH2:15][CH2:16][CH2:17][CH2:18]2>>[CH3:1][CH2:2][O:3][C:4](=[O:5])[c:6]1[cH:7][n:8][c:9]2[c:10]([c:11]1[Cl:12])[CH2:13][CH2:14][CH2:15][CH2:16][CH2:17][CH2:18]2";

    const FORMYLATION: &str = "C1CCOC1.O[CH3:18].[CH3:1][CH2:2][N:3]([C:4]([CH3:5])=[O:19])[c:6]1[cH:7][c:8]([O:9][CH2:10][c:11]2[cH:12][cH:13][cH:14][cH:15][cH:16]2)[cH:17][cH:20][c:21]1[O:22][CH3:23]>>[CH3:1][CH2:2][N:3]([CH2:4][CH3:5])[c:6]1[cH:7][c:8]([O:9][CH2:10][c:11]2[cH:12][cH:13][cH:14][cH:15][cH:16]2)[c:17]([CH:18]=[O:19])[cH:20][c:21]1[O:22][CH3:23]";

    const CHLORINATION: &str = "ClC(Cl)Cl.O=S(Cl)[Cl:5].O[CH2:4][C:2]([CH3:1])([CH3:3])[NH:6][C:7]1=[N:8][CH2:9][CH2:10][NH:11]1.[IH:12]>>[CH3:1][C:2]([CH3:3])([CH2:4][Cl:5])[NH:6][C:7]1=[N:8][CH2:9][CH2:10][NH:11]1";

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn descriptor_orders_endpoints_numerically() {
        assert_eq!(bond_descriptor(10, 9, BondOrder::Single), "9_10_SINGLE");
        assert_eq!(bond_descriptor(0, 6, BondOrder::Double), "0_6_DOUBLE");
    }

    #[test]
    fn neighbourhoods_of_conjugated_ester() {
        let smiles = "C1CCOC1.CO.COC(C)(C)C.Cl[Ni]Cl.[BH4-].[CH3:1][O:2][C:3](=[O:4])[CH:5]=[CH:6][c:7]1[cH:8][cH:9][c:10]([CH2:11][O:12][c:13]2[cH:14][c:15]([F:16])[cH:17][cH:18][c:19]2[F:20])[cH:21][c:22]1[OH:23].[Na+]";
        let n = atomic_neighbourhoods(&Smiles, smiles);

        assert_eq!(n.len(), 23);
        assert_eq!(n[&1], strings(&["1_2_SINGLE"]));
        assert_eq!(n[&3], strings(&["2_3_SINGLE", "3_4_DOUBLE", "3_5_SINGLE"]));
        assert_eq!(n[&7], strings(&["6_7_SINGLE", "7_22_AROMATIC", "7_8_AROMATIC"]));
        assert_eq!(
            n[&10],
            strings(&["10_11_SINGLE", "10_21_AROMATIC", "9_10_AROMATIC"])
        );
        assert_eq!(
            n[&15],
            strings(&["14_15_AROMATIC", "15_16_SINGLE", "15_17_AROMATIC"])
        );
        assert_eq!(
            n[&22],
            strings(&["21_22_AROMATIC", "22_23_SINGLE", "7_22_AROMATIC"])
        );
        assert_eq!(n[&23], strings(&["22_23_SINGLE"]));
    }

    #[test]
    fn neighbourhoods_record_unmapped_endpoints_as_zero() {
        let smiles = "C1COCCO1.CC(C)(C)[S@@](=O)[NH:1][C@H:2]1[CH2:3][CH2:4][CH2:5][N:6]([C:7](=[O:8])[O:9][CH2:10][c:11]2[cH:12][cH:13][cH:14][cH:15][cH:16]2)[CH2:17][CH2:18]1.CO.Cl";
        let n = atomic_neighbourhoods(&Smiles, smiles);

        assert_eq!(n.len(), 18);
        assert_eq!(n[&1], strings(&["0_1_SINGLE", "1_2_SINGLE"]));
        assert_eq!(n[&2], strings(&["1_2_SINGLE", "2_18_SINGLE", "2_3_SINGLE"]));
        assert_eq!(n[&6], strings(&["5_6_SINGLE", "6_17_SINGLE", "6_7_SINGLE"]));
        assert_eq!(n[&10], strings(&["10_11_SINGLE", "9_10_SINGLE"]));
        assert_eq!(n[&16], strings(&["11_16_AROMATIC", "15_16_AROMATIC"]));
        assert_eq!(n[&18], strings(&["17_18_SINGLE", "2_18_SINGLE"]));
    }

    #[test]
    fn neighbourhoods_of_ylide_and_aldehyde() {
        let smiles = "Cc1ccccc1.O=C(O)c1ccccc1.O=[CH:8][CH:9]1[CH2:10][CH2:11][CH:12]([C:13]([CH3:14])([CH3:15])[CH2:16][CH3:17])[CH2:18][CH2:19]1.c1ccc(P(c2ccccc2)(c2ccccc2)=[C:6]([C:4]([O:3][CH2:2][CH3:1])=[O:5])[CH3:7])cc1";
        let n = atomic_neighbourhoods(&Smiles, smiles);

        assert_eq!(n.keys().copied().collect::<Vec<_>>(), (1..=19).collect::<Vec<_>>());
        assert_eq!(n[&6], strings(&["0_6_DOUBLE", "4_6_SINGLE", "6_7_SINGLE"]));
        assert_eq!(n[&8], strings(&["0_8_DOUBLE", "8_9_SINGLE"]));
        assert_eq!(
            n[&13],
            strings(&["12_13_SINGLE", "13_14_SINGLE", "13_15_SINGLE", "13_16_SINGLE"])
        );
        assert_eq!(n[&19], strings(&["18_19_SINGLE", "9_19_SINGLE"]));
    }

    #[test]
    fn isolated_mapped_atom_has_no_entry() {
        let n = atomic_neighbourhoods(&Smiles, "[IH:12].[CH3:1][OH:2]");
        assert!(!n.contains_key(&12));
        assert_eq!(n.len(), 2);
    }

    #[test]
    fn repeated_map_number_keeps_last_atom() {
        let n = atomic_neighbourhoods(&Smiles, "[CH3:1]O.[CH2:1]=O");
        assert_eq!(n[&1], strings(&["0_1_DOUBLE"]));
    }

    #[test]
    fn unparseable_input_yields_empty_mapping() {
        assert!(atomic_neighbourhoods(&Smiles, "C1CC(").is_empty());
        assert!(try_atomic_neighbourhoods(&Smiles, "C1CC(").is_err());
    }

    #[test]
    fn halogenation_changes_only_reacting_atoms() {
        let (precursors, products) = split(HALOGENATION);
        assert_eq!(changed(&Smiles, precursors, products), vec![11, 12]);
        let mut expected_same: Vec<MapNumber> = (1..=10).collect();
        expected_same.extend(13..=18);
        assert_eq!(same(&Smiles, precursors, products), expected_same);
    }

    #[test]
    fn formylation_classification() {
        let (precursors, products) = split(FORMYLATION);
        let classification = classify(&Smiles, precursors, products);
        assert_eq!(classification.changed, vec![4, 17, 18, 19]);
        assert_eq!(
            classification.same,
            vec![1, 2, 3, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16, 20, 21, 22, 23]
        );
    }

    #[test]
    fn chlorination_ignores_isolated_reagent() {
        let (precursors, products) = split(CHLORINATION);
        let classification = classify(&Smiles, precursors, products);
        assert_eq!(classification.changed, vec![4, 5]);
        assert_eq!(classification.same, vec![1, 2, 3, 6, 7, 8, 9, 10, 11]);
        assert!(!all_atom_indices(&Smiles, precursors, products).contains(&12));
    }

    #[test]
    fn changed_and_same_partition_all_indices() {
        for rxn in [HALOGENATION, FORMYLATION, CHLORINATION] {
            let (precursors, products) = split(rxn);
            let classification = classify(&Smiles, precursors, products);
            let changed: BTreeSet<_> = classification.changed.iter().copied().collect();
            let same: BTreeSet<_> = classification.same.iter().copied().collect();
            assert!(changed.is_disjoint(&same));
            let union: BTreeSet<_> = changed.union(&same).copied().collect();
            assert_eq!(union, all_atom_indices(&Smiles, precursors, products));
        }
    }

    #[test]
    fn all_atom_indices_of_deprotection() {
        let rxn = "CO.O=C(OCc1ccccc1)[NH:9][C@@H:7]([C:5]([NH:4][CH:2]([CH3:1])[CH3:3])=[O:6])[CH3:8].[H][H].[Pd]>>[CH3:1][CH:2]([CH3:3])[NH:4][C:5](=[O:6])[C@@H:7]([CH3:8])[NH2:9]";
        let (precursors, products) = split(rxn);
        assert_eq!(
            all_atom_indices(&Smiles, precursors, products),
            (1..=9).collect::<BTreeSet<_>>()
        );
    }

    #[test]
    fn disjoint_mapped_sets_are_all_changed() {
        let classification = classify(&Smiles, "[CH3:1][OH:2]", "[CH3:3][NH2:4]");
        assert_eq!(classification.changed, vec![1, 2, 3, 4]);
        assert!(classification.same.is_empty());
    }

    #[test]
    fn kind_names_parse_and_unknown_names_fail() {
        assert_eq!("changed".parse::<AtomEnvironment>().unwrap(), AtomEnvironment::Changed);
        assert_eq!("SAME".parse::<AtomEnvironment>().unwrap(), AtomEnvironment::Same);
        let err = atom_list_by_name(&Smiles, "[CH3:1]O", "[CH3:1]N", "different").unwrap_err();
        assert!(matches!(err, EngineError::InvalidArgument(_)));
    }
}
