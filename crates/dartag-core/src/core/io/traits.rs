use crate::core::models::molecule::Molecule;
use std::error::Error;

/// Whether structural validation runs after a notation string is parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Sanitization {
    /// Build the graph as written; malformed chemistry is accepted.
    #[default]
    Skip,
    /// Reject graphs that fail aromaticity, Kekulé or valence checks.
    Full,
}

/// Defines the interface for reading and writing a line notation for molecules.
///
/// Implementors turn a notation string into a [`Molecule`] (atoms in order of
/// appearance, each optionally carrying a map number) and serialize a molecule
/// back. The tagging engine depends only on this interface.
pub trait MolecularNotation {
    /// The error type for parse failures.
    type Error: Error + Send + Sync + 'static;

    /// Parses a notation string into a molecule.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not valid notation or, with
    /// [`Sanitization::Full`], if the resulting graph fails validation.
    fn parse(&self, notation: &str, sanitization: Sanitization) -> Result<Molecule, Self::Error>;

    /// Serializes a molecule. Components are joined with `.`.
    fn write(&self, molecule: &Molecule) -> String;

    /// Serializes a molecule so that every spelling of it gives the same string.
    fn write_canonical(&self, molecule: &Molecule) -> String;

    /// Parses `notation`, applies `edit` to the molecule and writes it back.
    fn rewrite(
        &self,
        notation: &str,
        sanitization: Sanitization,
        edit: impl FnOnce(&mut Molecule),
    ) -> Result<String, Self::Error> {
        let mut molecule = self.parse(notation, sanitization)?;
        edit(&mut molecule);
        Ok(self.write(&molecule))
    }
}
