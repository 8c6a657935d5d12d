use crate::element::Element;

/// A graph vertex label.
///
/// Organic-subset atoms are plain values with no per-instance state, so
/// they are cheap to copy around; only bracket atoms carry properties of
/// their own.
///
/// # Examples
///
/// ```
/// use kekule::{Atom, Element};
///
/// let carbon = Atom::Aliphatic(Element::C);
/// assert_eq!(carbon.element(), Element::C);
/// assert!(!carbon.is_bracket());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Atom {
    /// Uppercase organic-subset atom written without brackets.
    Aliphatic(Element),
    /// Lowercase organic-subset atom written without brackets.
    Aromatic(Element),
    Bracket(BracketAtom),
}

/// Everything that may appear between `[` and `]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct BracketAtom {
    /// Mass number. `None` means natural isotopic abundance.
    pub isotope: Option<u16>,
    pub element: Element,
    pub aromatic: bool,
    /// Explicit hydrogen count; bracket atoms never gain implicit hydrogens.
    pub hydrogens: u8,
    pub charge: i8,
    /// Atom class (`:n`), `0` when absent.
    pub class: u32,
    /// Verbatim bracket content that could not be read as an atom. When set
    /// the other fields are defaults and the label is written back as-is.
    pub label: Option<String>,
}

impl BracketAtom {
    pub fn new(element: Element) -> BracketAtom {
        BracketAtom {
            element,
            ..BracketAtom::default()
        }
    }

    pub fn labelled(label: impl Into<String>) -> BracketAtom {
        BracketAtom {
            label: Some(label.into()),
            ..BracketAtom::default()
        }
    }
}

impl Atom {
    /// The shorthand atom for `element`, if it may be written unbracketed.
    pub fn subset(element: Element, aromatic: bool) -> Option<Atom> {
        if aromatic && element.is_aromatic_subset() {
            Some(Atom::Aromatic(element))
        } else if !aromatic && element.is_organic_subset() {
            Some(Atom::Aliphatic(element))
        } else {
            None
        }
    }

    pub fn element(&self) -> Element {
        match self {
            Atom::Aliphatic(e) | Atom::Aromatic(e) => *e,
            Atom::Bracket(b) => b.element,
        }
    }

    pub fn aromatic(&self) -> bool {
        match self {
            Atom::Aliphatic(_) => false,
            Atom::Aromatic(_) => true,
            Atom::Bracket(b) => b.aromatic,
        }
    }

    pub fn charge(&self) -> i8 {
        match self {
            Atom::Bracket(b) => b.charge,
            _ => 0,
        }
    }

    pub fn isotope(&self) -> Option<u16> {
        match self {
            Atom::Bracket(b) => b.isotope,
            _ => None,
        }
    }

    pub fn class(&self) -> u32 {
        match self {
            Atom::Bracket(b) => b.class,
            _ => 0,
        }
    }

    pub fn label(&self) -> Option<&str> {
        match self {
            Atom::Bracket(b) => b.label.as_deref(),
            _ => None,
        }
    }

    /// Hydrogens written inside brackets; `None` for subset atoms whose
    /// hydrogens are implied by valence.
    pub fn explicit_hydrogens(&self) -> Option<u8> {
        match self {
            Atom::Bracket(b) => Some(b.hydrogens),
            _ => None,
        }
    }

    pub fn is_bracket(&self) -> bool {
        matches!(self, Atom::Bracket(_))
    }

    /// The same atom with its aromatic flag cleared.
    pub fn to_aliphatic(&self) -> Atom {
        match self {
            Atom::Aromatic(e) => Atom::Aliphatic(*e),
            Atom::Bracket(b) if b.aromatic => Atom::Bracket(BracketAtom {
                aromatic: false,
                ..b.clone()
            }),
            other => other.clone(),
        }
    }
}

impl crate::traits::HasAtomicNum for Atom {
    fn atomic_num(&self) -> u8 {
        self.element().atomic_num()
    }
}

impl crate::traits::HasFormalCharge for Atom {
    fn formal_charge(&self) -> i8 {
        self.charge()
    }
}

impl crate::traits::HasIsotope for Atom {
    fn isotope(&self) -> u16 {
        Atom::isotope(self).unwrap_or(0)
    }
}

impl crate::traits::HasAromaticity for Atom {
    fn is_aromatic(&self) -> bool {
        self.aromatic()
    }
}
