mod bracket;
mod buffer;
pub mod error;
mod parser;
mod writer;

use crate::graph::Graph;
pub use error::{ErrorKind, SmilesError, Warning, WriteError};
pub use writer::{to_smiles, to_smiles_with, RingNumbering, WriteOptions};

/// Parser settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Reject the forms that lenient parsing accepts with a warning.
    pub strict: bool,
    /// Assign Kekulé bond orders to aromatic input.
    pub kekulise: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions {
            strict: false,
            kekulise: true,
        }
    }
}

impl ParseOptions {
    pub fn strict() -> ParseOptions {
        ParseOptions {
            strict: true,
            ..ParseOptions::default()
        }
    }
}

/// A parsed graph along with everything lenient parsing let through.
#[derive(Debug, Clone)]
pub struct Parsed {
    pub graph: Graph,
    pub warnings: Vec<Warning>,
}

/// Parses with the default options: lenient, and Kekulé form for aromatic
/// input. Warnings are only logged.
pub fn parse_smiles(s: &str) -> Result<Graph, SmilesError> {
    Ok(parse_smiles_with(s, &ParseOptions::default())?.graph)
}

pub fn parse_smiles_with(s: &str, options: &ParseOptions) -> Result<Parsed, SmilesError> {
    parser::parse(s, options)
}
