use tracing::debug;

use crate::core::io::traits::{MolecularNotation, Sanitization};
use crate::core::models::reaction::Reaction;

/// Clears every map number and writes the molecule back in canonical form;
/// "" if unparseable.
pub fn remove_mapping<N: MolecularNotation>(notation: &N, smiles: &str) -> String {
    match notation.parse(smiles, Sanitization::Skip) {
        Ok(mut molecule) => {
            molecule.clear_map_numbers();
            notation.write_canonical(&molecule)
        }
        Err(e) => {
            debug!("Could not remove mapping from '{}': {}", smiles, e);
            String::new()
        }
    }
}

/// [`remove_mapping`] applied to each side of a reaction string. The result
/// keeps the `reactants>agents>products` layout; "" if any side fails.
pub fn remove_rxn_mapping<N: MolecularNotation>(notation: &N, rxn: &str) -> String {
    let Ok(reaction) = rxn.parse::<Reaction>() else {
        debug!("Could not split reaction '{}'", rxn);
        return String::new();
    };

    let mut sides = Vec::with_capacity(3);
    for side in [&reaction.reactants, &reaction.agents, &reaction.products] {
        if side.is_empty() {
            sides.push(String::new());
            continue;
        }
        let unmapped = remove_mapping(notation, &side.join("."));
        if unmapped.is_empty() {
            return String::new();
        }
        sides.push(unmapped);
    }
    sides.join(">")
}

/// Rewrites every component in canonical form through a sanitized parse and
/// sorts the components lexicographically; "" on failure.
pub fn standardise_reaction_component<N: MolecularNotation>(notation: &N, component: &str) -> String {
    match notation.parse(component, Sanitization::Full) {
        Ok(molecule) => {
            let written = notation.write_canonical(&molecule);
            let mut parts: Vec<&str> = written.split('.').collect();
            parts.sort_unstable();
            parts.join(".")
        }
        Err(e) => {
            debug!("Could not standardise '{}': {}", component, e);
            String::new()
        }
    }
}

/// Drops every `.`-separated component that has no mapped atom; "" if any
/// component fails a sanitized parse.
pub fn remove_unmapped_components<N: MolecularNotation>(notation: &N, component: &str) -> String {
    let mut kept = Vec::new();
    for part in component.split('.') {
        let molecule = match notation.parse(part, Sanitization::Full) {
            Ok(molecule) => molecule,
            Err(e) => {
                debug!("Could not parse component '{}': {}", part, e);
                return String::new();
            }
        };
        if molecule.atoms().any(|(_, atom)| atom.is_mapped()) {
            kept.push(notation.write(&molecule));
        }
    }
    kept.join(".")
}
