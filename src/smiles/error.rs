use std::fmt;

use thiserror::Error;

use crate::bond::Bond;
use crate::kekulize::KekulizeError;
use crate::topology::TopologyError;

/// Errors produced when parsing a SMILES string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SmilesError {
    /// The input was empty or contained only whitespace.
    #[error("empty SMILES string")]
    EmptyInput,
    /// A malformed or inconsistent construct at byte offset `pos` of `input`.
    #[error("{kind}:\n{}", window(.input, .pos))]
    Syntax {
        kind: ErrorKind,
        input: String,
        pos: usize,
    },
    /// Kekulization of the aromatic system failed.
    #[error(transparent)]
    Kekulize(#[from] KekulizeError),
}

impl SmilesError {
    /// The syntax error kind, if this is one.
    pub fn kind(&self) -> Option<&ErrorKind> {
        match self {
            SmilesError::Syntax { kind, .. } => Some(kind),
            _ => None,
        }
    }

    /// Byte offset of a syntax error.
    pub fn position(&self) -> Option<usize> {
        match self {
            SmilesError::Syntax { pos, .. } => Some(*pos),
            _ => None,
        }
    }
}

/// What went wrong at a given position. Non-strict parsing reports the
/// recoverable kinds as [`Warning`]s instead of failing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ErrorKind {
    #[error("unexpected character '{0}'")]
    UnexpectedChar(char),
    #[error("unrecognised element symbol")]
    InvalidElement,
    #[error("unclosed bracket atom")]
    UnclosedBracket,
    #[error("invalid isotope")]
    InvalidIsotope,
    #[error("invalid chirality")]
    InvalidChirality,
    #[error("invalid hydrogen count")]
    InvalidHydrogenCount,
    #[error("invalid charge")]
    InvalidCharge,
    #[error("invalid atom class")]
    InvalidAtomClass,
    #[error("bracket content '{0}' kept as an unrecognised label")]
    UnrecognisedBracketAtom(String),
    #[error("cannot open a branch before an atom")]
    BranchBeforeAtom,
    #[error("closing of an unopened branch")]
    UnopenedBranch,
    #[error("unclosed branch")]
    UnclosedBranch,
    #[error("empty branch")]
    EmptyBranch,
    #[error("multiple bonds specified")]
    RepeatedBond,
    #[error("bond is not followed by an atom")]
    DanglingBond,
    #[error("ring bond before any atom")]
    RingBeforeAtom,
    #[error("unclosed ring {0}")]
    UnclosedRing(u32),
    #[error("invalid ring number")]
    InvalidRingNumber,
    #[error("ring closure bonds '{0}' and '{1}' disagree")]
    RingBondConflict(Bond, Bond),
    #[error("ring closure joins an atom to itself")]
    SelfLoop,
    #[error("atoms are already bonded")]
    DuplicateBond,
    #[error("'{0}' written outside brackets")]
    HydrogenShorthand(char),
    #[error("'{0}' is not a standard aromatic element")]
    AbnormalAromatic(String),
    #[error("stereo centre needs {expected} neighbours, found {found}")]
    StereoCarriers { expected: usize, found: usize },
    #[error("extended tetrahedral configuration on an atom that is not an allene centre")]
    NotAnAllene,
    #[error("invalid stereo: {0}")]
    Stereo(TopologyError),
    #[error("multiple directional bonds on one side of a double bond")]
    ConflictingDirectionalBonds,
}

/// A problem that non-strict parsing recovered from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Warning {
    pub kind: ErrorKind,
    /// Byte offset into the input.
    pub position: usize,
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at position {}", self.kind, self.position)
    }
}

/// Errors produced when writing a graph as SMILES.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WriteError {
    #[error("more than 99 ring bonds open at once")]
    RingNumbersExhausted,
    #[error("stereo at atom {focus}: {source}")]
    Stereo {
        focus: usize,
        #[source]
        source: TopologyError,
    },
}

/// The input line with a caret under `pos`.
fn window(input: &str, pos: &usize) -> String {
    let offset = input
        .get(..*pos)
        .map(|s| s.chars().count())
        .unwrap_or(input.len());
    format!("{input}\n{}^", " ".repeat(offset))
}
