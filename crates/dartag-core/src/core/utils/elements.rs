use phf::{Map, phf_map, phf_set};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Element {
    pub symbol: &'static str,
    pub atomic_number: u8,
}

pub const WILDCARD: Element = Element {
    symbol: "*",
    atomic_number: 0,
};

macro_rules! element {
    ($symbol:literal, $number:literal) => {
        Element {
            symbol: $symbol,
            atomic_number: $number,
        }
    };
}

#[rustfmt::skip]
static ELEMENTS: Map<&'static str, Element> = phf_map! {
    "H" => element!("H", 1), "He" => element!("He", 2),
    "Li" => element!("Li", 3), "Be" => element!("Be", 4), "B" => element!("B", 5),
    "C" => element!("C", 6), "N" => element!("N", 7), "O" => element!("O", 8),
    "F" => element!("F", 9), "Ne" => element!("Ne", 10),
    "Na" => element!("Na", 11), "Mg" => element!("Mg", 12), "Al" => element!("Al", 13),
    "Si" => element!("Si", 14), "P" => element!("P", 15), "S" => element!("S", 16),
    "Cl" => element!("Cl", 17), "Ar" => element!("Ar", 18),
    "K" => element!("K", 19), "Ca" => element!("Ca", 20), "Sc" => element!("Sc", 21),
    "Ti" => element!("Ti", 22), "V" => element!("V", 23), "Cr" => element!("Cr", 24),
    "Mn" => element!("Mn", 25), "Fe" => element!("Fe", 26), "Co" => element!("Co", 27),
    "Ni" => element!("Ni", 28), "Cu" => element!("Cu", 29), "Zn" => element!("Zn", 30),
    "Ga" => element!("Ga", 31), "Ge" => element!("Ge", 32), "As" => element!("As", 33),
    "Se" => element!("Se", 34), "Br" => element!("Br", 35), "Kr" => element!("Kr", 36),
    "Rb" => element!("Rb", 37), "Sr" => element!("Sr", 38), "Y" => element!("Y", 39),
    "Zr" => element!("Zr", 40), "Nb" => element!("Nb", 41), "Mo" => element!("Mo", 42),
    "Tc" => element!("Tc", 43), "Ru" => element!("Ru", 44), "Rh" => element!("Rh", 45),
    "Pd" => element!("Pd", 46), "Ag" => element!("Ag", 47), "Cd" => element!("Cd", 48),
    "In" => element!("In", 49), "Sn" => element!("Sn", 50), "Sb" => element!("Sb", 51),
    "Te" => element!("Te", 52), "I" => element!("I", 53), "Xe" => element!("Xe", 54),
    "Cs" => element!("Cs", 55), "Ba" => element!("Ba", 56), "La" => element!("La", 57),
    "Ce" => element!("Ce", 58), "Pr" => element!("Pr", 59), "Nd" => element!("Nd", 60),
    "Pm" => element!("Pm", 61), "Sm" => element!("Sm", 62), "Eu" => element!("Eu", 63),
    "Gd" => element!("Gd", 64), "Tb" => element!("Tb", 65), "Dy" => element!("Dy", 66),
    "Ho" => element!("Ho", 67), "Er" => element!("Er", 68), "Tm" => element!("Tm", 69),
    "Yb" => element!("Yb", 70), "Lu" => element!("Lu", 71), "Hf" => element!("Hf", 72),
    "Ta" => element!("Ta", 73), "W" => element!("W", 74), "Re" => element!("Re", 75),
    "Os" => element!("Os", 76), "Ir" => element!("Ir", 77), "Pt" => element!("Pt", 78),
    "Au" => element!("Au", 79), "Hg" => element!("Hg", 80), "Tl" => element!("Tl", 81),
    "Pb" => element!("Pb", 82), "Bi" => element!("Bi", 83), "Po" => element!("Po", 84),
    "At" => element!("At", 85), "Rn" => element!("Rn", 86), "Fr" => element!("Fr", 87),
    "Ra" => element!("Ra", 88), "Ac" => element!("Ac", 89), "Th" => element!("Th", 90),
    "Pa" => element!("Pa", 91), "U" => element!("U", 92), "Np" => element!("Np", 93),
    "Pu" => element!("Pu", 94), "Am" => element!("Am", 95), "Cm" => element!("Cm", 96),
    "Bk" => element!("Bk", 97), "Cf" => element!("Cf", 98), "Es" => element!("Es", 99),
    "Fm" => element!("Fm", 100), "Md" => element!("Md", 101), "No" => element!("No", 102),
    "Lr" => element!("Lr", 103), "Rf" => element!("Rf", 104), "Db" => element!("Db", 105),
    "Sg" => element!("Sg", 106), "Bh" => element!("Bh", 107), "Hs" => element!("Hs", 108),
    "Mt" => element!("Mt", 109), "Ds" => element!("Ds", 110), "Rg" => element!("Rg", 111),
    "Cn" => element!("Cn", 112), "Nh" => element!("Nh", 113), "Fl" => element!("Fl", 114),
    "Mc" => element!("Mc", 115), "Lv" => element!("Lv", 116), "Ts" => element!("Ts", 117),
    "Og" => element!("Og", 118),
};

// Normal valences used to derive implicit hydrogens on bare organic-subset atoms.
#[rustfmt::skip]
static ORGANIC_SUBSET_VALENCES: Map<&'static str, &'static [u8]> = phf_map! {
    "B" => &[3],
    "C" => &[4],
    "N" => &[3, 5],
    "O" => &[2],
    "P" => &[3, 5],
    "S" => &[2, 4, 6],
    "F" => &[1], "Cl" => &[1], "Br" => &[1], "I" => &[1],
};

// Highest valence accepted for a neutral atom during sanitization. Elements absent
// from this table are not valence-checked.
#[rustfmt::skip]
static MAX_VALENCES: Map<&'static str, u8> = phf_map! {
    "H" => 1,
    "B" => 3, "C" => 4, "N" => 3, "O" => 2, "F" => 1,
    "Si" => 4, "P" => 7, "S" => 6, "Cl" => 1,
    "Ge" => 4, "As" => 5, "Se" => 6, "Br" => 1,
    "Sn" => 4, "Sb" => 5, "Te" => 6, "I" => 5,
};

static AROMATIC_CAPABLE: phf::Set<&'static str> = phf_set! {
    "B", "C", "N", "O", "P", "S", "Se", "As", "Te",
};

pub fn lookup(symbol: &str) -> Option<Element> {
    if symbol == "*" {
        return Some(WILDCARD);
    }
    ELEMENTS.get(symbol).copied()
}

pub fn is_organic_subset(symbol: &str) -> bool {
    ORGANIC_SUBSET_VALENCES.contains_key(symbol)
}

pub fn organic_subset_valences(symbol: &str) -> Option<&'static [u8]> {
    ORGANIC_SUBSET_VALENCES.get(symbol).copied()
}

pub fn max_valence(symbol: &str) -> Option<u8> {
    MAX_VALENCES.get(symbol).copied()
}

pub fn can_be_aromatic(symbol: &str) -> bool {
    AROMATIC_CAPABLE.contains(symbol)
}

/// Implicit hydrogen count of a bare (non-bracket) atom: the smallest normal
/// valence that accommodates `bond_order_sum`, minus that sum.
pub fn implicit_hydrogens(symbol: &str, bond_order_sum: u8) -> u8 {
    match organic_subset_valences(symbol) {
        Some(valences) => valences
            .iter()
            .find(|&&v| v >= bond_order_sum)
            .map(|&v| v - bond_order_sum)
            .unwrap_or(0),
        None => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_finds_one_and_two_letter_symbols() {
        assert_eq!(lookup("C").unwrap().atomic_number, 6);
        assert_eq!(lookup("Cl").unwrap().atomic_number, 17);
        assert_eq!(lookup("Pd").unwrap().symbol, "Pd");
        assert_eq!(lookup("*"), Some(WILDCARD));
    }

    #[test]
    fn lookup_is_case_sensitive() {
        assert!(lookup("cl").is_none());
        assert!(lookup("CL").is_none());
        assert!(lookup("Xx").is_none());
    }

    #[test]
    fn organic_subset_membership_matches_bare_atom_grammar() {
        for symbol in ["B", "C", "N", "O", "P", "S", "F", "Cl", "Br", "I"] {
            assert!(is_organic_subset(symbol), "{symbol}");
        }
        assert!(!is_organic_subset("Na"));
        assert!(!is_organic_subset("H"));
    }

    #[test]
    fn implicit_hydrogens_uses_lowest_fitting_valence() {
        assert_eq!(implicit_hydrogens("C", 0), 4);
        assert_eq!(implicit_hydrogens("C", 3), 1);
        assert_eq!(implicit_hydrogens("N", 4), 1);
        assert_eq!(implicit_hydrogens("S", 3), 1);
        assert_eq!(implicit_hydrogens("Cl", 1), 0);
    }

    #[test]
    fn implicit_hydrogens_is_zero_when_valences_are_exceeded() {
        assert_eq!(implicit_hydrogens("C", 5), 0);
        assert_eq!(implicit_hydrogens("Na", 0), 0);
    }

    #[test]
    fn max_valence_covers_main_group_only() {
        assert_eq!(max_valence("C"), Some(4));
        assert_eq!(max_valence("P"), Some(7));
        assert_eq!(max_valence("Pd"), None);
    }
}
