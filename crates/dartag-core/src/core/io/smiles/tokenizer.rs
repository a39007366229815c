use super::error::SmilesError;
use crate::core::models::atom::Chirality;
use crate::core::utils::elements::{self, Element};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Atom(AtomToken),
    Bond { bond: BondToken, pos: usize },
    RingClosure { digit: u16, pos: usize },
    OpenParen(usize),
    CloseParen(usize),
    Dot(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AtomToken {
    pub element: Element,
    pub is_aromatic: bool,
    pub isotope: Option<u16>,
    pub chirality: Chirality,
    /// `Some` for bracket atoms, holding the written H count (0 when absent).
    pub hcount: Option<u8>,
    pub charge: i8,
    pub atom_class: u32,
    pub pos: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BondToken {
    Single,
    Double,
    Triple,
    Aromatic,
    Up,
    Down,
}

pub fn tokenize(input: &str) -> Result<Vec<Token>, SmilesError> {
    let chars: Vec<char> = input.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let ch = chars[i];
        match ch {
            '[' => {
                let (atom, next) = parse_bracket_atom(&chars, i)?;
                tokens.push(Token::Atom(atom));
                i = next;
            }
            'B' | 'C' => {
                let two = match (ch, chars.get(i + 1)) {
                    ('B', Some('r')) => Some("Br"),
                    ('C', Some('l')) => Some("Cl"),
                    _ => None,
                };
                let symbol = two.unwrap_or(if ch == 'B' { "B" } else { "C" });
                tokens.push(Token::Atom(bare_atom(symbol, false, i)?));
                i += symbol.len();
            }
            'N' | 'O' | 'P' | 'S' | 'F' | 'I' => {
                tokens.push(Token::Atom(bare_atom(&ch.to_string(), false, i)?));
                i += 1;
            }
            'b' | 'c' | 'n' | 'o' | 'p' | 's' => {
                let symbol = ch.to_ascii_uppercase().to_string();
                tokens.push(Token::Atom(bare_atom(&symbol, true, i)?));
                i += 1;
            }
            '*' => {
                tokens.push(Token::Atom(AtomToken {
                    element: elements::WILDCARD,
                    ..blank_atom(i)
                }));
                i += 1;
            }
            '-' | '=' | '#' | ':' | '/' | '\\' => {
                let bond = match ch {
                    '-' => BondToken::Single,
                    '=' => BondToken::Double,
                    '#' => BondToken::Triple,
                    ':' => BondToken::Aromatic,
                    '/' => BondToken::Up,
                    '\\' => BondToken::Down,
                    _ => return Err(SmilesError::UnexpectedChar { pos: i, ch }),
                };
                tokens.push(Token::Bond { bond, pos: i });
                i += 1;
            }
            '(' => {
                tokens.push(Token::OpenParen(i));
                i += 1;
            }
            ')' => {
                tokens.push(Token::CloseParen(i));
                i += 1;
            }
            '.' => {
                tokens.push(Token::Dot(i));
                i += 1;
            }
            '%' => {
                let digits: Option<u16> = match (chars.get(i + 1), chars.get(i + 2)) {
                    (Some(a), Some(b)) if a.is_ascii_digit() && b.is_ascii_digit() => {
                        Some((digit_value(*a) * 10 + digit_value(*b)) as u16)
                    }
                    _ => None,
                };
                let digit = digits.ok_or(SmilesError::UnexpectedChar { pos: i, ch })?;
                tokens.push(Token::RingClosure { digit, pos: i });
                i += 3;
            }
            d if d.is_ascii_digit() => {
                tokens.push(Token::RingClosure {
                    digit: digit_value(d) as u16,
                    pos: i,
                });
                i += 1;
            }
            _ => return Err(SmilesError::UnexpectedChar { pos: i, ch }),
        }
    }

    Ok(tokens)
}

#[inline]
fn digit_value(ch: char) -> u32 {
    ch.to_digit(10).unwrap_or(0)
}

fn blank_atom(pos: usize) -> AtomToken {
    AtomToken {
        element: elements::WILDCARD,
        is_aromatic: false,
        isotope: None,
        chirality: Chirality::None,
        hcount: None,
        charge: 0,
        atom_class: 0,
        pos,
    }
}

fn bare_atom(symbol: &str, aromatic: bool, pos: usize) -> Result<AtomToken, SmilesError> {
    let element = elements::lookup(symbol).ok_or_else(|| SmilesError::InvalidElement {
        pos,
        text: symbol.to_string(),
    })?;
    Ok(AtomToken {
        element,
        is_aromatic: aromatic,
        ..blank_atom(pos)
    })
}

fn parse_bracket_atom(chars: &[char], start: usize) -> Result<(AtomToken, usize), SmilesError> {
    let mut i = start + 1;

    let isotope = parse_number(chars, &mut i, start)?
        .map(|v| u16::try_from(v).map_err(|_| SmilesError::InvalidNumber { pos: start }))
        .transpose()?;
    let (element, is_aromatic) = parse_bracket_element(chars, &mut i, start)?;
    let chirality = parse_chirality(chars, &mut i);
    let hcount = parse_hcount(chars, &mut i);
    let charge = parse_charge(chars, &mut i, start)?;
    let atom_class = if chars.get(i) == Some(&':') {
        i += 1;
        parse_number(chars, &mut i, start)?.ok_or(SmilesError::InvalidNumber { pos: start })?
    } else {
        0
    };

    if chars.get(i) != Some(&']') {
        return Err(SmilesError::UnclosedBracket { pos: start });
    }
    i += 1;

    Ok((
        AtomToken {
            element,
            is_aromatic,
            isotope,
            chirality,
            hcount: Some(hcount),
            charge,
            atom_class,
            pos: start,
        },
        i,
    ))
}

fn parse_number(chars: &[char], i: &mut usize, start: usize) -> Result<Option<u32>, SmilesError> {
    let mut value: Option<u32> = None;
    while let Some(d) = chars.get(*i).and_then(|c| c.to_digit(10)) {
        let next = value
            .unwrap_or(0)
            .checked_mul(10)
            .and_then(|v| v.checked_add(d))
            .ok_or(SmilesError::InvalidNumber { pos: start })?;
        value = Some(next);
        *i += 1;
    }
    Ok(value)
}

fn parse_bracket_element(
    chars: &[char],
    i: &mut usize,
    start: usize,
) -> Result<(Element, bool), SmilesError> {
    let Some(&first) = chars.get(*i) else {
        return Err(SmilesError::UnclosedBracket { pos: start });
    };

    if first == '*' {
        *i += 1;
        return Ok((elements::WILDCARD, false));
    }

    if first.is_ascii_lowercase() {
        // Aromatic symbols: two-letter forms take precedence.
        for symbol in ["se", "as", "te", "b", "c", "n", "o", "p", "s"] {
            let len = symbol.len();
            if *i + len <= chars.len() && chars[*i..*i + len].iter().copied().eq(symbol.chars()) {
                let capitalized = capitalize(symbol);
                if let Some(element) = elements::lookup(&capitalized) {
                    *i += len;
                    return Ok((element, true));
                }
            }
        }
        return Err(SmilesError::InvalidElement {
            pos: *i,
            text: first.to_string(),
        });
    }

    if first.is_ascii_uppercase() {
        if let Some(&second) = chars.get(*i + 1) {
            if second.is_ascii_lowercase() {
                let symbol: String = [first, second].iter().collect();
                if let Some(element) = elements::lookup(&symbol) {
                    *i += 2;
                    return Ok((element, false));
                }
            }
        }
        if let Some(element) = elements::lookup(&first.to_string()) {
            *i += 1;
            return Ok((element, false));
        }
    }

    Err(SmilesError::InvalidElement {
        pos: *i,
        text: first.to_string(),
    })
}

fn capitalize(symbol: &str) -> String {
    let mut chars = symbol.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}

fn parse_chirality(chars: &[char], i: &mut usize) -> Chirality {
    if chars.get(*i) != Some(&'@') {
        return Chirality::None;
    }
    *i += 1;
    if chars.get(*i) == Some(&'@') {
        *i += 1;
        Chirality::Clockwise
    } else {
        Chirality::CounterClockwise
    }
}

fn parse_hcount(chars: &[char], i: &mut usize) -> u8 {
    if chars.get(*i) != Some(&'H') {
        return 0;
    }
    *i += 1;
    match chars.get(*i).and_then(|c| c.to_digit(10)) {
        Some(d) => {
            *i += 1;
            d as u8
        }
        None => 1,
    }
}

fn parse_charge(chars: &[char], i: &mut usize, start: usize) -> Result<i8, SmilesError> {
    let sign: i8 = match chars.get(*i) {
        Some('+') => 1,
        Some('-') => -1,
        _ => return Ok(0),
    };
    let symbol = chars[*i];
    *i += 1;

    if chars.get(*i) == Some(&symbol) {
        let mut magnitude: i8 = 1;
        while chars.get(*i) == Some(&symbol) {
            magnitude = magnitude
                .checked_add(1)
                .ok_or(SmilesError::InvalidCharge { pos: start })?;
            *i += 1;
        }
        return Ok(sign * magnitude);
    }

    match parse_number(chars, i, start)? {
        Some(value) => {
            let magnitude = i8::try_from(value).map_err(|_| SmilesError::InvalidCharge { pos: start })?;
            Ok(sign * magnitude)
        }
        None => Ok(sign),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn atoms(tokens: &[Token]) -> Vec<&AtomToken> {
        tokens
            .iter()
            .filter_map(|t| match t {
                Token::Atom(a) => Some(a),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn two_letter_organic_atoms_are_recognised() {
        let tokens = tokenize("BrCCl").unwrap();
        let symbols: Vec<_> = atoms(&tokens).iter().map(|a| a.element.symbol).collect();
        assert_eq!(symbols, vec!["Br", "C", "Cl"]);
    }

    #[test]
    fn aromatic_atoms_are_flagged() {
        let tokens = tokenize("c1ccncc1").unwrap();
        let parsed = atoms(&tokens);
        assert_eq!(parsed.len(), 6);
        assert!(parsed.iter().all(|a| a.is_aromatic));
        assert_eq!(parsed[3].element.symbol, "N");
    }

    #[test]
    fn bracket_atom_fields_are_parsed() {
        let tokens = tokenize("[13CH3+:12]").unwrap();
        let atom = atoms(&tokens)[0].clone();
        assert_eq!(atom.element.symbol, "C");
        assert_eq!(atom.isotope, Some(13));
        assert_eq!(atom.hcount, Some(3));
        assert_eq!(atom.charge, 1);
        assert_eq!(atom.atom_class, 12);
    }

    #[test]
    fn bracket_atom_chirality_and_negative_charges() {
        let tokens = tokenize("[C@@H:7].[O-2].[Fe+++]").unwrap();
        let parsed = atoms(&tokens);
        assert_eq!(parsed[0].chirality, Chirality::Clockwise);
        assert_eq!(parsed[0].hcount, Some(1));
        assert_eq!(parsed[1].charge, -2);
        assert_eq!(parsed[2].charge, 3);
    }

    #[test]
    fn aromatic_bracket_atoms_accept_two_letter_symbols() {
        let tokens = tokenize("[se].[nH]").unwrap();
        let parsed = atoms(&tokens);
        assert_eq!(parsed[0].element.symbol, "Se");
        assert!(parsed[0].is_aromatic);
        assert_eq!(parsed[1].hcount, Some(1));
    }

    #[test]
    fn percent_ring_closures_are_two_digits() {
        let tokens = tokenize("C%12CC%12").unwrap();
        assert!(matches!(tokens[1], Token::RingClosure { digit: 12, .. }));
    }

    #[test]
    fn unknown_characters_are_rejected() {
        assert!(matches!(
            tokenize("C?C"),
            Err(SmilesError::UnexpectedChar { pos: 1, ch: '?' })
        ));
        assert!(matches!(
            tokenize("[Xx]"),
            Err(SmilesError::InvalidElement { .. })
        ));
        assert!(matches!(
            tokenize("[CH4"),
            Err(SmilesError::UnclosedBracket { pos: 0 })
        ));
    }
}
