//! SMILES reader and writer.
//!
//! Parsing is split into tokenization and graph construction; sanitization is an
//! optional validation pass on the finished graph. The writer has two modes:
//! input order, which walks each component from its lowest-indexed atom, and
//! canonical, which walks by canonical atom rank.

mod canonical;
mod error;
mod parser;
mod sanitize;
mod tokenizer;
mod writer;

pub use error::SmilesError;
pub use canonical::canonical_ranks;
pub use writer::{write_canonical_smiles, write_smiles};

use super::traits::{MolecularNotation, Sanitization};
use crate::core::models::molecule::Molecule;

/// The SMILES notation provider.
#[derive(Debug, Clone, Copy, Default)]
pub struct Smiles;

impl MolecularNotation for Smiles {
    type Error = SmilesError;

    fn parse(&self, notation: &str, sanitization: Sanitization) -> Result<Molecule, SmilesError> {
        parse_smiles(notation, sanitization)
    }

    fn write(&self, molecule: &Molecule) -> String {
        write_smiles(molecule)
    }

    fn write_canonical(&self, molecule: &Molecule) -> String {
        write_canonical_smiles(molecule)
    }
}

pub fn parse_smiles(smiles: &str, sanitization: Sanitization) -> Result<Molecule, SmilesError> {
    let trimmed = smiles.trim();
    if trimmed.is_empty() {
        return Err(SmilesError::EmptyInput);
    }
    let tokens = tokenizer::tokenize(trimmed)?;
    let molecule = parser::build_molecule(&tokens)?;
    if sanitization == Sanitization::Full {
        sanitize::sanitize(&molecule)?;
    }
    Ok(molecule)
}
