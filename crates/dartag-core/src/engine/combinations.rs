use std::collections::BTreeMap;

use itertools::Itertools;
use rand::Rng;
use rand::seq::index;

use super::error::EngineError;
use super::tagging::TAG;
use crate::core::io::traits::{MolecularNotation, Sanitization};
use crate::core::models::molecule::Molecule;

/// Subset sizes are drawn from `1..min(tagged, MAX_COMBINATION_SIZE)`.
pub const MAX_COMBINATION_SIZE: usize = 4;

/// Subset size -> subsets of tagged positional indices of that size.
pub type TagCombinations = BTreeMap<usize, Vec<Vec<usize>>>;

/// Positional indices of atoms carrying any nonzero map number.
pub fn changed_ids(molecule: &Molecule) -> Vec<usize> {
    molecule.mapped_atom_indices()
}

fn size_range(tagged: usize) -> std::ops::Range<usize> {
    1..tagged.min(MAX_COMBINATION_SIZE)
}

/// Enumerates every subset of the tagged positions, grouped by size.
///
/// Sizes run from 1 up to one below `min(N, 4)`, so a molecule with fewer than
/// two tagged atoms yields no groups at all.
pub fn tag_combinations(molecule: &Molecule) -> TagCombinations {
    let ids = changed_ids(molecule);
    size_range(ids.len())
        .map(|size| (size, ids.iter().copied().combinations(size).collect()))
        .collect()
}

/// Number of subsets [`tag_combinations`] would produce for the sanitized
/// parse of `tagged`; 0 if it does not parse.
pub fn count_combinations<N: MolecularNotation>(notation: &N, tagged: &str) -> usize {
    match notation.parse(tagged, Sanitization::Full) {
        Ok(molecule) => tag_combinations(&molecule).values().map(Vec::len).sum(),
        Err(_) => 0,
    }
}

/// Draws `k` distinct subsets from every size class, sizes ascending.
///
/// # Errors
///
/// Returns [`EngineError::InsufficientCandidates`] if any size class holds
/// fewer than `k` subsets.
pub fn sample_permutation_ids(
    combinations: &TagCombinations,
    k: usize,
    rng: &mut impl Rng,
) -> Result<Vec<Vec<usize>>, EngineError> {
    let mut sampled = Vec::with_capacity(combinations.len() * k);
    for (&size, candidates) in combinations {
        if k > candidates.len() {
            return Err(EngineError::InsufficientCandidates {
                size,
                requested: k,
                available: candidates.len(),
            });
        }
        sampled.extend(
            index::sample(rng, candidates.len(), k)
                .into_iter()
                .map(|i| candidates[i].clone()),
        );
    }
    Ok(sampled)
}

/// Writes one copy of `molecule` per subset, with exactly the atoms in the
/// subset tagged and every other map number cleared.
pub fn permute_tagged_molecule<N: MolecularNotation>(
    notation: &N,
    molecule: &Molecule,
    permutation_ids: &[Vec<usize>],
) -> Vec<String> {
    let mut working = molecule.clone();
    permutation_ids
        .iter()
        .map(|ids| {
            for index in 0..working.atom_count() {
                let tag = if ids.contains(&index) { TAG } else { 0 };
                working.set_map_number(index, tag);
            }
            notation.write(&working)
        })
        .collect()
}

/// Samples `k` tag subsets per size class from a tagged molecule and writes
/// each as its own tagged string.
///
/// # Errors
///
/// Returns [`EngineError::Parse`] if `tagged` fails a sanitized parse and
/// [`EngineError::InsufficientCandidates`] if a size class is too small.
pub fn permute_tagged_smiles<N: MolecularNotation>(
    notation: &N,
    tagged: &str,
    k: usize,
    rng: &mut impl Rng,
) -> Result<Vec<String>, EngineError> {
    let molecule = notation
        .parse(tagged, Sanitization::Full)
        .map_err(|e| EngineError::parse(tagged, e))?;
    let combinations = tag_combinations(&molecule);
    let ids = sample_permutation_ids(&combinations, k, rng)?;
    Ok(permute_tagged_molecule(notation, &molecule, &ids))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::io::smiles::Smiles;
    use crate::engine::tagging::count_tags;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    const TWO_TAGS: &str =
        "Cc1nc(C)c(-c2cn(CCC[CH2:1][N:1]3C[C@@H]4C[C@]4(c4ccc(C(F)(F)F)cc4)C3)c(=O)[nH]c2=O)o1";
    const FOUR_TAGS: &str = "Fc1ccc(C(=C(C2[CH2:1][CH2:1]2)[CH2:1][OH:1])c2ccc(F)cc2)cc1";
    const EIGHT_TAGS: &str = "CC[c:1]1[cH:1][c:1]([NH2:1])[cH:1][cH:1][c:1]1[OH:1]";

    fn parse(smiles: &str) -> Molecule {
        Smiles.parse(smiles, Sanitization::Full).unwrap()
    }

    #[test]
    fn combination_counts_follow_size_cap() {
        assert_eq!(count_combinations(&Smiles, TWO_TAGS), 2);
        assert_eq!(count_combinations(&Smiles, FOUR_TAGS), 14);
        assert_eq!(count_combinations(&Smiles, EIGHT_TAGS), 92);
    }

    #[test]
    fn count_matches_enumerated_subsets() {
        for smiles in [TWO_TAGS, FOUR_TAGS, EIGHT_TAGS] {
            let enumerated: usize = tag_combinations(&parse(smiles)).values().map(Vec::len).sum();
            assert_eq!(count_combinations(&Smiles, smiles), enumerated);
        }
    }

    #[test]
    fn combinations_are_grouped_by_size() {
        let combos = tag_combinations(&parse(FOUR_TAGS));
        assert_eq!(combos.keys().copied().collect::<Vec<_>>(), vec![1, 2, 3]);
        assert_eq!(combos[&1].len(), 4);
        assert_eq!(combos[&2].len(), 6);
        assert_eq!(combos[&3].len(), 4);
        assert!(combos[&2].iter().all(|c| c.len() == 2));
    }

    #[test]
    fn fewer_than_two_tags_give_no_combinations() {
        assert!(tag_combinations(&parse("C[CH2:1]O")).is_empty());
        assert_eq!(count_combinations(&Smiles, "CCO"), 0);
    }

    #[test]
    fn unparseable_or_unsanitizable_input_counts_zero() {
        assert_eq!(count_combinations(&Smiles, "[c:1]1[c:1]ccc1"), 0);
        assert_eq!(count_combinations(&Smiles, "[C:1]("), 0);
    }

    #[test]
    fn sampling_draws_k_distinct_subsets_per_size() {
        let combos = tag_combinations(&parse(EIGHT_TAGS));
        let mut rng = StdRng::seed_from_u64(7);
        let sampled = sample_permutation_ids(&combos, 3, &mut rng).unwrap();

        assert_eq!(sampled.len(), 9);
        for (chunk, size) in sampled.chunks(3).zip(1..) {
            assert!(chunk.iter().all(|ids| ids.len() == size));
            assert!(chunk.iter().all(|ids| combos[&size].contains(ids)));
            assert_ne!(chunk[0], chunk[1]);
            assert_ne!(chunk[1], chunk[2]);
            assert_ne!(chunk[0], chunk[2]);
        }
    }

    #[test]
    fn sampling_is_reproducible_with_same_seed() {
        let combos = tag_combinations(&parse(FOUR_TAGS));
        let first = sample_permutation_ids(&combos, 2, &mut StdRng::seed_from_u64(42)).unwrap();
        let second = sample_permutation_ids(&combos, 2, &mut StdRng::seed_from_u64(42)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn sampling_more_than_available_fails() {
        let combos = tag_combinations(&parse(FOUR_TAGS));
        let err = sample_permutation_ids(&combos, 5, &mut StdRng::seed_from_u64(1)).unwrap_err();
        assert!(matches!(
            err,
            EngineError::InsufficientCandidates {
                size: 1,
                requested: 5,
                available: 4
            }
        ));
    }

    #[test]
    fn permuted_outputs_tag_exactly_the_subset() {
        let molecule = parse(FOUR_TAGS);
        let ids = vec![vec![changed_ids(&molecule)[0]], changed_ids(&molecule)[1..3].to_vec()];
        let outputs = permute_tagged_molecule(&Smiles, &molecule, &ids);

        assert_eq!(outputs.len(), 2);
        assert_eq!(count_tags(&Smiles, &outputs[0]), 1);
        assert_eq!(count_tags(&Smiles, &outputs[1]), 2);
    }

    #[test]
    fn permute_tagged_smiles_samples_every_size_class() {
        let mut rng = StdRng::seed_from_u64(3);
        let outputs = permute_tagged_smiles(&Smiles, FOUR_TAGS, 1, &mut rng).unwrap();
        let counts: Vec<usize> = outputs.iter().map(|s| count_tags(&Smiles, s)).collect();
        assert_eq!(counts, vec![1, 2, 3]);
    }

    #[test]
    fn permute_tagged_smiles_rejects_unsanitizable_input() {
        let mut rng = StdRng::seed_from_u64(3);
        let err = permute_tagged_smiles(&Smiles, "[c:1]1[c:1]ccc1", 1, &mut rng).unwrap_err();
        assert!(matches!(err, EngineError::Parse { .. }));
    }
}
