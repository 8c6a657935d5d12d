use super::buffer::CharBuffer;
use super::error::ErrorKind;
use crate::atom::{Atom, BracketAtom};
use crate::configuration::{Configuration, ConfigurationType};
use crate::element::Element;

/// Error kind and the byte offset it was found at.
pub(crate) type Failure = (ErrorKind, usize);

/// A bracket atom with its stereo mark, which belongs to the graph rather
/// than the atom.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct BracketContent {
    pub atom: Atom,
    pub configuration: Configuration,
    /// Set when the element is an aromatic symbol outside the standard set;
    /// only reachable when not strict.
    pub abnormal_aromatic: Option<String>,
}

/// Reads an atom after its opening `[`, consuming the closing `]`.
pub(crate) fn parse_bracket_atom(
    buf: &mut CharBuffer,
    strict: bool,
) -> Result<BracketContent, Failure> {
    let isotope = parse_isotope(buf)?;
    let (element, aromatic, abnormal_aromatic) = parse_bracket_element(buf, strict)?;
    let configuration = parse_chirality(buf)?;
    let hydrogens = parse_hcount(buf)?;
    let charge = parse_charge(buf)?;
    let class = parse_atom_class(buf)?;

    match buf.get() {
        Some(b']') => {}
        Some(_) => {
            let pos = buf.position() - 1;
            return Err((ErrorKind::UnexpectedChar(buf.char_at(pos)), pos));
        }
        None => return Err((ErrorKind::UnclosedBracket, buf.position())),
    }

    Ok(BracketContent {
        atom: Atom::Bracket(BracketAtom {
            isotope,
            element,
            aromatic,
            hydrogens,
            charge,
            class,
            label: None,
        }),
        configuration,
        abnormal_aromatic,
    })
}

/// Reads everything up to the `]` matching an already consumed `[`, for
/// content that is not a recognisable atom. Nested brackets must balance.
pub(crate) fn read_label<'a>(buf: &mut CharBuffer<'a>) -> Option<&'a str> {
    let start = buf.position();
    let mut depth = 1usize;
    while let Some(c) = buf.get() {
        match c {
            b'[' => depth += 1,
            b']' => {
                depth -= 1;
                if depth == 0 {
                    return buf.text().get(start..buf.position() - 1);
                }
            }
            _ => {}
        }
    }
    None
}

fn parse_isotope(buf: &mut CharBuffer) -> Result<Option<u16>, Failure> {
    let pos = buf.position();
    let digits = buf.digits();
    if digits.is_empty() {
        return Ok(None);
    }
    digits
        .parse()
        .map(Some)
        .map_err(|_| (ErrorKind::InvalidIsotope, pos))
}

fn parse_bracket_element(
    buf: &mut CharBuffer,
    strict: bool,
) -> Result<(Element, bool, Option<String>), Failure> {
    let pos = buf.position();
    let Some(first) = buf.peek() else {
        return Err((ErrorKind::UnclosedBracket, pos));
    };

    if first == b'*' {
        buf.get();
        return Ok((Element::Unknown, false, None));
    }

    if first.is_ascii_lowercase() {
        // two-letter aromatic symbols first: "se" is selenium, not "s" + "e"
        if let Some(second) = buf.peek_at(1).filter(u8::is_ascii_lowercase) {
            let symbol = String::from_utf8_lossy(&[first, second]).into_owned();
            if let Some(e) = Element::from_aromatic_symbol(&symbol, false) {
                if e.is_standard_aromatic() {
                    buf.set_position(pos + 2);
                    return Ok((e, true, None));
                }
                if strict {
                    return Err((ErrorKind::AbnormalAromatic(symbol), pos));
                }
                buf.set_position(pos + 2);
                return Ok((e, true, Some(symbol)));
            }
        }
        let symbol = (first as char).to_string();
        if let Some(e) = Element::from_aromatic_symbol(&symbol, true) {
            buf.get();
            return Ok((e, true, None));
        }
        return Err((ErrorKind::InvalidElement, pos));
    }

    if first.is_ascii_uppercase() {
        if let Some(second) = buf.peek_at(1).filter(u8::is_ascii_lowercase) {
            let symbol = String::from_utf8_lossy(&[first, second]).into_owned();
            if let Some(e) = Element::from_symbol(&symbol) {
                buf.set_position(pos + 2);
                return Ok((e, false, None));
            }
        }
        let symbol = (first as char).to_string();
        if let Some(e) = Element::from_symbol(&symbol) {
            buf.get();
            return Ok((e, false, None));
        }
    }

    Err((ErrorKind::InvalidElement, pos))
}

/// `@`, `@@`, or `@` followed by a two-letter geometry and its number.
fn parse_chirality(buf: &mut CharBuffer) -> Result<Configuration, Failure> {
    let pos = buf.position();
    if !buf.get_if(b'@') {
        return Ok(Configuration::Unknown);
    }
    if buf.get_if(b'@') {
        return Ok(Configuration::Clockwise);
    }

    let (Some(a), Some(b)) = (buf.peek(), buf.peek_at(1)) else {
        return Ok(Configuration::AntiClockwise);
    };
    let prefix = [a, b];
    let named = [
        ConfigurationType::Tetrahedral,
        ConfigurationType::ExtendedTetrahedral,
        ConfigurationType::DoubleBond,
        ConfigurationType::SquarePlanar,
        ConfigurationType::TrigonalBipyramidal,
        ConfigurationType::Octahedral,
    ]
    .iter()
    .any(|kind| kind.prefix().as_bytes() == prefix);
    if !named {
        return Ok(Configuration::AntiClockwise);
    }

    buf.set_position(pos + 3);
    let digits = buf.digits();
    let symbol = &buf.text()[pos..buf.position()];
    if digits.is_empty() {
        return Err((ErrorKind::InvalidChirality, pos));
    }
    Configuration::from_symbol(symbol).ok_or((ErrorKind::InvalidChirality, pos))
}

fn parse_hcount(buf: &mut CharBuffer) -> Result<u8, Failure> {
    let pos = buf.position();
    if !buf.get_if(b'H') {
        return Ok(0);
    }
    let digits = buf.digits();
    if digits.is_empty() {
        return Ok(1);
    }
    digits
        .parse()
        .map_err(|_| (ErrorKind::InvalidHydrogenCount, pos))
}

fn parse_charge(buf: &mut CharBuffer) -> Result<i8, Failure> {
    let pos = buf.position();
    let (sign, symbol): (i8, u8) = match buf.peek() {
        Some(b'+') => (1, b'+'),
        Some(b'-') => (-1, b'-'),
        _ => return Ok(0),
    };
    buf.get();

    if buf.next_is(symbol) {
        let mut count: i8 = sign;
        while buf.get_if(symbol) {
            count = count
                .checked_add(sign)
                .ok_or((ErrorKind::InvalidCharge, pos))?;
        }
        return Ok(count);
    }

    let digits = buf.digits();
    if digits.is_empty() {
        return Ok(sign);
    }
    digits
        .parse::<i8>()
        .ok()
        .and_then(|v| v.checked_mul(sign))
        .ok_or((ErrorKind::InvalidCharge, pos))
}

fn parse_atom_class(buf: &mut CharBuffer) -> Result<u32, Failure> {
    let pos = buf.position();
    if !buf.get_if(b':') {
        return Ok(0);
    }
    let digits = buf.digits();
    if digits.is_empty() {
        return Err((ErrorKind::InvalidAtomClass, pos));
    }
    digits
        .parse()
        .map_err(|_| (ErrorKind::InvalidAtomClass, pos))
}
