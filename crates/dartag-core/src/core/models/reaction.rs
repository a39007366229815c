use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// The empty reaction, used as a placeholder for reactions that failed to map.
pub const EMPTY_REACTION: &str = ">>";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReactionError {
    #[error("Reaction '{input}' has {sides} '>'-separated sides, expected 3")]
    Malformed { input: String, sides: usize },
}

/// A reaction string split into its three sides. Each side is a list of
/// `.`-separated components, kept as written.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reaction {
    pub reactants: Vec<String>,
    pub agents: Vec<String>,
    pub products: Vec<String>,
}

impl Reaction {
    /// Reactants followed by agents, joined with `.`.
    pub fn precursors(&self) -> String {
        self.reactants
            .iter()
            .chain(&self.agents)
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(".")
    }

    pub fn reactants_smiles(&self) -> String {
        self.reactants.join(".")
    }

    pub fn products_smiles(&self) -> String {
        self.products.join(".")
    }

    pub fn is_empty(&self) -> bool {
        self.reactants.is_empty() && self.agents.is_empty() && self.products.is_empty()
    }

    /// Parses reaction SMILES in any of the usual layouts: plain
    /// `reactants>agents>products`, an extended trailer (` |f:0.1|`) which is
    /// dropped, or `~`-joined fragments, which become separate components.
    pub fn parse_any(input: &str) -> Result<Self, ReactionError> {
        let core = input.trim();
        let core = match core.split_once(" |") {
            Some((smiles, _)) => smiles.trim_end(),
            None => core,
        };
        core.replace('~', ".").parse()
    }
}

fn split_side(side: &str) -> Vec<String> {
    side.split('.')
        .filter(|c| !c.is_empty())
        .map(String::from)
        .collect()
}

impl FromStr for Reaction {
    type Err = ReactionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let sides: Vec<&str> = s.trim().split('>').collect();
        if sides.len() != 3 {
            return Err(ReactionError::Malformed {
                input: s.to_string(),
                sides: sides.len(),
            });
        }
        Ok(Self {
            reactants: split_side(sides[0]),
            agents: split_side(sides[1]),
            products: split_side(sides[2]),
        })
    }
}

impl fmt::Display for Reaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}>{}>{}",
            self.reactants.join("."),
            self.agents.join("."),
            self.products.join(".")
        )
    }
}
