use crate::core::utils::elements::Element;

/// Atom-map number. Zero means the atom is unmapped.
pub type MapNumber = u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Chirality {
    #[default]
    None,
    /// `@`
    CounterClockwise,
    /// `@@`
    Clockwise,
}

impl Chirality {
    pub fn inverted(self) -> Self {
        match self {
            Self::None => Self::None,
            Self::CounterClockwise => Self::Clockwise,
            Self::Clockwise => Self::CounterClockwise,
        }
    }

    pub fn is_chiral(self) -> bool {
        self != Self::None
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Atom {
    pub element: Element,
    pub is_aromatic: bool,
    pub isotope: Option<u16>,
    pub chirality: Chirality,
    /// Explicit hydrogen count; `Some` exactly for atoms written in brackets.
    pub explicit_hydrogens: Option<u8>,
    pub formal_charge: i8,
    pub map_number: MapNumber,
}

impl Atom {
    pub fn new(element: Element) -> Self {
        Self {
            element,
            is_aromatic: false,
            isotope: None,
            chirality: Chirality::None,
            explicit_hydrogens: None,
            formal_charge: 0,
            map_number: 0,
        }
    }

    pub fn aromatic(element: Element) -> Self {
        Self {
            is_aromatic: true,
            ..Self::new(element)
        }
    }

    #[inline]
    pub fn symbol(&self) -> &'static str {
        self.element.symbol
    }

    #[inline]
    pub fn is_mapped(&self) -> bool {
        self.map_number != 0
    }

    #[inline]
    pub fn is_bracket(&self) -> bool {
        self.explicit_hydrogens.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::utils::elements::lookup;

    #[test]
    fn new_atom_is_unmapped_and_bare() {
        let atom = Atom::new(lookup("C").unwrap());
        assert_eq!(atom.symbol(), "C");
        assert!(!atom.is_mapped());
        assert!(!atom.is_bracket());
        assert!(!atom.is_aromatic);
    }

    #[test]
    fn chirality_inversion_swaps_handedness() {
        assert_eq!(Chirality::Clockwise.inverted(), Chirality::CounterClockwise);
        assert_eq!(Chirality::CounterClockwise.inverted(), Chirality::Clockwise);
        assert_eq!(Chirality::None.inverted(), Chirality::None);
        assert!(!Chirality::None.is_chiral());
    }
}
