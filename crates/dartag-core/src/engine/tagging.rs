use std::collections::HashSet;
use std::sync::LazyLock;

use fancy_regex::Regex;

use super::environment::classify;
use super::error::EngineError;
use crate::core::io::traits::{MolecularNotation, Sanitization};
use crate::core::models::atom::MapNumber;

/// Map number that marks an atom whose bonding environment changed.
pub const TAG: MapNumber = 1;

static TAG_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r":1\]").expect("Invalid tag pattern"));

/// Rewrites the product so that every atom carries map number 1 if its
/// original map number is CHANGED between the two sides and 0 otherwise.
///
/// # Errors
///
/// Returns [`EngineError::Parse`] if `products` cannot be parsed. Unparseable
/// precursors only degrade the classification (every product atom is compared
/// against an empty neighbourhood).
pub fn tag_products<N: MolecularNotation>(
    notation: &N,
    precursors: &str,
    products: &str,
) -> Result<String, EngineError> {
    let changed: HashSet<MapNumber> = classify(notation, precursors, products)
        .changed
        .into_iter()
        .collect();

    notation
        .rewrite(products, Sanitization::Skip, |molecule| {
            for index in 0..molecule.atom_count() {
                let original = molecule.map_number(index);
                let tag = if original != 0 && changed.contains(&original) {
                    TAG
                } else {
                    0
                };
                molecule.set_map_number(index, tag);
            }
        })
        .map_err(|e| EngineError::parse(products, e))
}

/// Number of atoms carrying the tag value, read from the parsed graph; 0 if
/// the string does not parse.
pub fn count_tags<N: MolecularNotation>(notation: &N, tagged: &str) -> usize {
    notation
        .parse(tagged, Sanitization::Skip)
        .map(|molecule| molecule.atoms().filter(|(_, a)| a.map_number == TAG).count())
        .unwrap_or(0)
}

/// Counts `:1]` occurrences in the string without parsing it.
///
/// Agrees with [`count_tags`] on everything [`tag_products`] emits. On
/// arbitrary mapped input it counts any atom that carries map number 1.
pub fn find_number_tags(smiles: &str) -> usize {
    TAG_PATTERN.find_iter(smiles).flatten().count()
}
