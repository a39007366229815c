use thiserror::Error;

use super::mapping::MappingError;
use super::tokenization::TokenizationError;
use crate::core::io::table::TableError;

type BoxedSource = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Failed to parse '{notation}': {source}")]
    Parse {
        notation: String,
        #[source]
        source: BoxedSource,
    },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error(
        "Cannot draw {requested} tag combination(s) of size {size}: only {available} available"
    )]
    InsufficientCandidates {
        size: usize,
        requested: usize,
        available: usize,
    },

    #[error("Table error: {source}")]
    Table {
        #[from]
        source: TableError,
    },

    #[error("Atom mapping failed: {source}")]
    Mapping {
        #[from]
        source: MappingError,
    },

    #[error("Tokenization failed: {source}")]
    Tokenization {
        #[from]
        source: TokenizationError,
    },
}

impl EngineError {
    pub fn parse(notation: &str, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Parse {
            notation: notation.to_string(),
            source: Box::new(source),
        }
    }
}
