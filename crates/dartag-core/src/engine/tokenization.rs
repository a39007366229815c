//! Atom-level tokenization of (enzymatic) reaction SMILES.
//!
//! An enzymatic reaction carries its EC number after the precursors,
//! `reactants|1.2.3.4>>products`. Tokenized, each EC level becomes its own
//! token (`[v1] [u2] [t3] [q4]`) placed between a `|` token and the arrow.

use std::sync::LazyLock;

use fancy_regex::Regex;
use thiserror::Error;

pub const SMILES_TOKEN_PATTERN: &str = r"(\[[^\]]+]|Br?|Cl?|N|O|S|P|F|I|b|c|n|o|s|p|\||\(|\)|\.|=|#|-|\+|\\|\/|:|~|@|\?|>>?|\*|\$|\%[0-9]{2}|[0-9])";

/// Token prefixes of the four EC levels, outermost first.
const EC_LEVELS: [char; 4] = ['v', 'u', 't', 'q'];

const ARROW: &str = ">>";
const EC_SEPARATOR: char = '|';

static TOKEN_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(SMILES_TOKEN_PATTERN).expect("Invalid SMILES token pattern"));

static EC_TOKEN_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([vutq])([^\]]*)\]").expect("Invalid EC token pattern"));

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum TokenizationError {
    #[error("Reaction '{0}' has no '>>' separator")]
    MissingArrow(String),
    #[error("EC number '{ec}' has {levels} levels, at most 4 are supported")]
    TooManyEcLevels { ec: String, levels: usize },
    #[error("Malformed EC tokens '{0}'")]
    MalformedEcTokens(String),
}

fn tokens(smiles: &str) -> Vec<&str> {
    TOKEN_REGEX
        .find_iter(smiles)
        .flatten()
        .map(|m| m.as_str())
        .collect()
}

/// Space-separated atom-level tokens of a SMILES (or reaction SMILES) string.
pub fn tokenize_smiles(smiles: &str) -> String {
    tokens(smiles).join(" ")
}

fn ec_tokens(ec: &str) -> Result<Vec<String>, TokenizationError> {
    let levels: Vec<&str> = ec.split('.').collect();
    if levels.len() > EC_LEVELS.len() {
        return Err(TokenizationError::TooManyEcLevels {
            ec: ec.to_string(),
            levels: levels.len(),
        });
    }
    Ok(levels
        .iter()
        .zip(EC_LEVELS)
        .map(|(level, prefix)| format!("[{}{}]", prefix, level))
        .collect())
}

/// Tokenizes `reactants|ec>>products`, turning the EC number into level
/// tokens. Without an EC number the result is plain SMILES tokenization.
pub fn tokenize_enzymatic_reaction_smiles(rxn: &str) -> Result<String, TokenizationError> {
    let (precursors, products) = rxn
        .split_once(ARROW)
        .ok_or_else(|| TokenizationError::MissingArrow(rxn.to_string()))?;
    let (reactants, ec) = match precursors.split_once(EC_SEPARATOR) {
        Some((reactants, ec)) => (reactants, ec.trim()),
        None => (precursors, ""),
    };

    let mut out: Vec<String> = tokens(reactants).into_iter().map(String::from).collect();
    if !ec.is_empty() {
        out.push(EC_SEPARATOR.to_string());
        out.extend(ec_tokens(ec)?);
    }
    out.push(ARROW.to_string());
    out.extend(tokens(products).into_iter().map(String::from));
    Ok(out.join(" "))
}

fn decode_ec(tokens: &str) -> Result<String, TokenizationError> {
    let mut levels = Vec::new();
    let mut consumed = 0;
    for caps in EC_TOKEN_REGEX.captures_iter(tokens).flatten() {
        let (Some(whole), Some(value)) = (caps.get(0), caps.get(2)) else {
            continue;
        };
        if whole.start() != consumed {
            return Err(TokenizationError::MalformedEcTokens(tokens.to_string()));
        }
        consumed = whole.end();
        levels.push(value.as_str());
    }
    if consumed != tokens.len() {
        return Err(TokenizationError::MalformedEcTokens(tokens.to_string()));
    }
    Ok(levels.join("."))
}

/// Reverses [`tokenize_enzymatic_reaction_smiles`].
pub fn detokenize_enzymatic_reaction_smiles(tokenized: &str) -> Result<String, TokenizationError> {
    let joined: String = tokenized.split_whitespace().collect();
    let (precursors, products) = joined
        .split_once(ARROW)
        .ok_or_else(|| TokenizationError::MissingArrow(tokenized.to_string()))?;
    match precursors.split_once(EC_SEPARATOR) {
        Some((reactants, ec)) => Ok(format!(
            "{}{}{}{}{}",
            reactants,
            EC_SEPARATOR,
            decode_ec(ec)?,
            ARROW,
            products
        )),
        None => Ok(joined),
    }
}

/// Tokenized reactants (including any EC tokens) and tokenized products.
pub fn tokenize_and_split_enzymatic_reaction_smiles(
    rxn: &str,
) -> Result<(String, String), TokenizationError> {
    let tokenized = tokenize_enzymatic_reaction_smiles(rxn)?;
    let (reactants, products) = tokenized
        .split_once(ARROW)
        .ok_or_else(|| TokenizationError::MissingArrow(rxn.to_string()))?;
    Ok((reactants.trim().to_string(), products.trim().to_string()))
}

/// Detokenized reactants, EC number if present, and products.
pub fn detokenize_and_split_enzymatic_reaction_smiles(
    tokenized: &str,
) -> Result<(String, Option<String>, String), TokenizationError> {
    let rxn = detokenize_enzymatic_reaction_smiles(tokenized)?;
    let (precursors, products) = rxn
        .split_once(ARROW)
        .ok_or_else(|| TokenizationError::MissingArrow(tokenized.to_string()))?;
    let (reactants, ec) = match precursors.split_once(EC_SEPARATOR) {
        Some((reactants, ec)) => (reactants.trim(), Some(ec.trim().to_string())),
        None => (precursors.trim(), None),
    };
    Ok((reactants.to_string(), ec, products.trim().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const ENZYMATIC: &str = "CC(=O)O.[Na+]|3.1.1.1>>CC(=O)[O-]";

    #[test]
    fn tokenize_smiles_splits_atoms_and_bonds() {
        assert_eq!(tokenize_smiles("Brc1ccccc1Cl"), "Br c 1 c c c c c 1 Cl");
        assert_eq!(tokenize_smiles("[C@@H](N)C%12"), "[C@@H] ( N ) C %12");
    }

    #[test]
    fn tokenize_enzymatic_inserts_ec_tokens_before_arrow() {
        assert_eq!(
            tokenize_enzymatic_reaction_smiles(ENZYMATIC).unwrap(),
            "C C ( = O ) O . [Na+] | [v3] [u1] [t1] [q1] >> C C ( = O ) [O-]"
        );
    }

    #[test]
    fn partial_ec_numbers_use_leading_levels() {
        assert_eq!(
            tokenize_enzymatic_reaction_smiles("O|1.14>>O").unwrap(),
            "O | [v1] [u14] >> O"
        );
    }

    #[test]
    fn reaction_without_ec_has_no_separator_token() {
        assert_eq!(tokenize_enzymatic_reaction_smiles("CO>>C=O").unwrap(), "C O >> C = O");
    }

    #[test]
    fn tokenize_rejects_bad_input() {
        assert!(matches!(
            tokenize_enzymatic_reaction_smiles("CCO"),
            Err(TokenizationError::MissingArrow(_))
        ));
        assert!(matches!(
            tokenize_enzymatic_reaction_smiles("C|1.2.3.4.5>>C"),
            Err(TokenizationError::TooManyEcLevels { levels: 5, .. })
        ));
    }

    #[test]
    fn detokenize_restores_enzymatic_reaction() {
        let tokenized = tokenize_enzymatic_reaction_smiles(ENZYMATIC).unwrap();
        assert_eq!(detokenize_enzymatic_reaction_smiles(&tokenized).unwrap(), ENZYMATIC);
        assert_eq!(
            detokenize_enzymatic_reaction_smiles("C O >> C = O").unwrap(),
            "CO>>C=O"
        );
    }

    #[test]
    fn detokenize_rejects_garbage_in_ec_section() {
        assert!(matches!(
            detokenize_enzymatic_reaction_smiles("C | [v1] x >> C"),
            Err(TokenizationError::MalformedEcTokens(_))
        ));
    }

    #[test]
    fn tokenize_and_split_keeps_ec_with_reactants() {
        let (reactants, products) = tokenize_and_split_enzymatic_reaction_smiles(ENZYMATIC).unwrap();
        assert_eq!(reactants, "C C ( = O ) O . [Na+] | [v3] [u1] [t1] [q1]");
        assert_eq!(products, "C C ( = O ) [O-]");
    }

    #[test]
    fn detokenize_and_split_separates_ec() {
        let (reactants, ec, products) = detokenize_and_split_enzymatic_reaction_smiles(
            "C C ( = O ) O | [v3] [u1] [t1] [q1] >> C C O",
        )
        .unwrap();
        assert_eq!(reactants, "CC(=O)O");
        assert_eq!(ec.as_deref(), Some("3.1.1.1"));
        assert_eq!(products, "CCO");

        let (_, ec, _) = detokenize_and_split_enzymatic_reaction_smiles("C >> C").unwrap();
        assert_eq!(ec, None);
    }
}
