//! SMILES parsing and writing over a compact molecular graph, with Kekulé
//! structure assignment for aromatic input.
//!
//! ```
//! use kekule::smiles::{parse_smiles, to_smiles};
//!
//! let benzene = parse_smiles("c1ccccc1").unwrap();
//! assert_eq!(to_smiles(&benzene).unwrap(), "C=1C=CC=CC1");
//! ```

pub mod atom;
pub mod bond;
pub mod configuration;
pub mod element;
pub mod graph;
pub mod graph_ops;
pub mod kekulize;
pub mod matching;
pub mod smiles;
pub mod topology;
pub mod traits;

pub use atom::{Atom, BracketAtom};
pub use bond::Bond;
pub use configuration::{Configuration, ConfigurationType};
pub use element::Element;
pub use graph::{Edge, EdgeId, Graph};
pub use graph_ops::{
    connected_components, cyclic_edges, cyclic_vertices, permute, to_petgraph, PermuteError,
};
pub use kekulize::{kekulise, resonate, KekulizeError};
pub use matching::{maximum_matching, Matching};
pub use smiles::{
    parse_smiles, parse_smiles_with, to_smiles, to_smiles_with, ParseOptions, Parsed,
    SmilesError, WriteError, WriteOptions,
};
pub use topology::{Topology, TopologyError};
pub use traits::{HasAromaticity, HasAtomicNum, HasBondOrder, HasFormalCharge, HasIsotope};
