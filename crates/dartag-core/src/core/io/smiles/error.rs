use thiserror::Error;

/// Errors produced while reading or validating a SMILES string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SmilesError {
    #[error("empty SMILES string")]
    EmptyInput,
    #[error("unexpected character '{ch}' at position {pos}")]
    UnexpectedChar { pos: usize, ch: char },
    #[error("unknown element '{text}' at position {pos}")]
    InvalidElement { pos: usize, text: String },
    #[error("unclosed bracket atom starting at position {pos}")]
    UnclosedBracket { pos: usize },
    #[error("invalid charge in bracket atom at position {pos}")]
    InvalidCharge { pos: usize },
    #[error("invalid number in bracket atom at position {pos}")]
    InvalidNumber { pos: usize },
    #[error("unclosed ring {digit}")]
    UnclosedRing { digit: u16 },
    #[error("ring closure {digit} at position {pos} has no preceding atom")]
    DanglingRingClosure { digit: u16, pos: usize },
    #[error("ring closure {digit} would bond an atom to itself or duplicate a bond")]
    InvalidRingBond { digit: u16 },
    #[error("conflicting bond types on ring closure {digit}")]
    RingBondConflict { digit: u16 },
    #[error("unmatched parenthesis at position {pos}")]
    UnmatchedParen { pos: usize },
    #[error("bond at position {pos} is not followed by an atom")]
    DanglingBond { pos: usize },
    #[error("non-ring atom {index} marked aromatic")]
    AromaticOutsideRing { index: usize },
    #[error("can't kekulize molecule: unmatched aromatic atoms {atoms:?}")]
    Kekulization { atoms: Vec<usize> },
    #[error("explicit valence {valence} of atom {index} ({symbol}) exceeds allowed {allowed}")]
    Valence {
        index: usize,
        symbol: &'static str,
        valence: u32,
        allowed: u32,
    },
}
