use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[repr(u8)]
pub enum BondOrder {
    #[default]
    Single,
    Double,
    Triple,
    Aromatic,
}

impl BondOrder {
    /// Upper-case name used in bond descriptors.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Single => "SINGLE",
            Self::Double => "DOUBLE",
            Self::Triple => "TRIPLE",
            Self::Aromatic => "AROMATIC",
        }
    }

    /// Bond order counted twice, so an aromatic bond contributes 3 (1.5 * 2).
    pub fn doubled_valence(&self) -> u8 {
        match self {
            Self::Single => 2,
            Self::Double => 4,
            Self::Triple => 6,
            Self::Aromatic => 3,
        }
    }
}

#[derive(Debug, Error)]
#[error("Invalid bond order string")]
pub struct ParseBondOrderError;

impl FromStr for BondOrder {
    type Err = ParseBondOrderError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "1" | "s" | "single" | "-" => Ok(Self::Single),
            "2" | "d" | "double" | "=" => Ok(Self::Double),
            "3" | "t" | "triple" | "#" => Ok(Self::Triple),
            "ar" | "aromatic" | ":" => Ok(Self::Aromatic),
            _ => Err(ParseBondOrderError),
        }
    }
}

impl fmt::Display for BondOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Directional marker of a single bond (`/` or `\`), relative to the
/// lower-indexed endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BondDirection {
    Up,
    Down,
}

impl BondDirection {
    pub fn reversed(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Bond {
    pub order: BondOrder,
    pub direction: Option<BondDirection>,
}

impl Bond {
    pub fn new(order: BondOrder) -> Self {
        Self {
            order,
            direction: None,
        }
    }

    pub fn directional(direction: BondDirection) -> Self {
        Self {
            order: BondOrder::Single,
            direction: Some(direction),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bond_order_from_str_parses_valid_strings() {
        assert_eq!("1".parse::<BondOrder>().unwrap(), BondOrder::Single);
        assert_eq!("single".parse::<BondOrder>().unwrap(), BondOrder::Single);
        assert_eq!("-".parse::<BondOrder>().unwrap(), BondOrder::Single);
        assert_eq!("D".parse::<BondOrder>().unwrap(), BondOrder::Double);
        assert_eq!("=".parse::<BondOrder>().unwrap(), BondOrder::Double);
        assert_eq!("triple".parse::<BondOrder>().unwrap(), BondOrder::Triple);
        assert_eq!("#".parse::<BondOrder>().unwrap(), BondOrder::Triple);
        assert_eq!(
            "AROMATIC".parse::<BondOrder>().unwrap(),
            BondOrder::Aromatic
        );
    }

    #[test]
    fn bond_order_from_str_rejects_invalid_strings() {
        assert!("".parse::<BondOrder>().is_err());
        assert!("quadruple".parse::<BondOrder>().is_err());
        assert!("0".parse::<BondOrder>().is_err());
    }

    #[test]
    fn bond_order_display_uses_descriptor_names() {
        assert_eq!(BondOrder::Single.to_string(), "SINGLE");
        assert_eq!(BondOrder::Double.to_string(), "DOUBLE");
        assert_eq!(BondOrder::Triple.to_string(), "TRIPLE");
        assert_eq!(BondOrder::Aromatic.to_string(), "AROMATIC");
    }

    #[test]
    fn bond_order_default_is_single() {
        assert_eq!(BondOrder::default(), BondOrder::Single);
    }

    #[test]
    fn directional_bonds_are_single() {
        let bond = Bond::directional(BondDirection::Up);
        assert_eq!(bond.order, BondOrder::Single);
        assert_eq!(bond.direction.map(BondDirection::reversed), Some(BondDirection::Down));
    }
}
