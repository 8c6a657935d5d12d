use crate::atom::Atom;
use crate::bond::Bond;
use crate::kekulize::{kekulise, KekulizeError};
use crate::topology::Topology;
use crate::traits::HasBondOrder;

/// Stable handle to an edge; indices never move once assigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeId(pub usize);

/// An undirected labelled edge.
///
/// The bond label is read relative to the first endpoint. Only directional
/// labels differ when read from the other side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Edge {
    u: usize,
    xor: usize,
    bond: Bond,
}

impl Edge {
    pub fn new(u: usize, v: usize, bond: Bond) -> Edge {
        Edge { u, xor: u ^ v, bond }
    }

    /// The first endpoint.
    pub fn either(&self) -> usize {
        self.u
    }

    /// The endpoint that is not `x`. `x` must be an endpoint.
    pub fn other(&self, x: usize) -> usize {
        self.xor ^ x
    }

    pub fn endpoints(&self) -> (usize, usize) {
        (self.u, self.xor ^ self.u)
    }

    pub fn bond(&self) -> Bond {
        self.bond
    }

    /// The label as seen from endpoint `x`.
    pub fn bond_from(&self, x: usize) -> Bond {
        if x == self.u {
            self.bond
        } else {
            self.bond.inverse()
        }
    }

    pub fn with_bond(&self, bond: Bond) -> Edge {
        Edge { bond, ..*self }
    }
}

/// A molecule as written in SMILES: labelled vertices, labelled edges and
/// optional per-vertex stereo topologies.
///
/// Each vertex keeps its incident edges in insertion order, unless an edge
/// was placed with [`Graph::insert_edge_at`]. For a parsed graph that is the
/// order the neighbours were written in, ring closures included: a closure
/// sits where its digit was written at the opening atom.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Graph {
    atoms: Vec<Atom>,
    edges: Vec<Edge>,
    adjacency: Vec<Vec<EdgeId>>,
    topologies: Vec<Option<Topology>>,
    flags: u8,
    title: Option<String>,
}

impl Graph {
    /// Contains aromatic atoms or bonds.
    pub const HAS_AROM: u8 = 0x1;
    /// Contains tetrahedral, square planar, bipyramidal or octahedral centres.
    pub const HAS_ATOM_STEREO: u8 = 0x2;
    /// Contains allene-like extended tetrahedral centres.
    pub const HAS_EXT_STEREO: u8 = 0x4;
    /// Contains `/` or `\` bonds.
    pub const HAS_BOND_STEREO: u8 = 0x8;
    pub const HAS_STEREO: u8 =
        Graph::HAS_ATOM_STEREO | Graph::HAS_EXT_STEREO | Graph::HAS_BOND_STEREO;

    pub fn new() -> Graph {
        Graph::default()
    }

    pub fn with_capacity(atoms: usize) -> Graph {
        Graph {
            atoms: Vec::with_capacity(atoms),
            edges: Vec::with_capacity(atoms + atoms / 2),
            adjacency: Vec::with_capacity(atoms),
            topologies: Vec::with_capacity(atoms),
            ..Graph::default()
        }
    }

    pub fn add_atom(&mut self, atom: Atom) -> usize {
        if atom.aromatic() {
            self.flags |= Graph::HAS_AROM;
        }
        self.atoms.push(atom);
        self.adjacency.push(Vec::new());
        self.topologies.push(None);
        self.atoms.len() - 1
    }

    /// Appends `edge` to both endpoints' adjacency lists.
    pub fn add_edge(&mut self, edge: Edge) -> EdgeId {
        let id = EdgeId(self.edges.len());
        let (u, v) = edge.endpoints();
        self.note_bond(edge.bond());
        self.edges.push(edge);
        self.adjacency[u].push(id);
        self.adjacency[v].push(id);
        id
    }

    /// Like [`Graph::add_edge`], but places the edge at index `at` of the
    /// first endpoint's adjacency list (clamped to its length). The second
    /// endpoint gets it appended.
    pub fn insert_edge_at(&mut self, edge: Edge, at: usize) -> EdgeId {
        let id = EdgeId(self.edges.len());
        let (u, v) = edge.endpoints();
        self.note_bond(edge.bond());
        self.edges.push(edge);
        let at = at.min(self.adjacency[u].len());
        self.adjacency[u].insert(at, id);
        self.adjacency[v].push(id);
        id
    }

    /// Reorders the adjacency list of `v`; `ids` must hold the same edges.
    pub(crate) fn reorder_adjacency(&mut self, v: usize, ids: &[EdgeId]) {
        debug_assert_eq!(
            {
                let mut a = self.adjacency[v].clone();
                a.sort_unstable();
                a
            },
            {
                let mut b = ids.to_vec();
                b.sort_unstable();
                b
            }
        );
        self.adjacency[v].clear();
        self.adjacency[v].extend_from_slice(ids);
    }

    /// Replaces an edge in place, keeping its position in both adjacency
    /// lists. The endpoints must not change.
    pub fn replace(&mut self, id: EdgeId, edge: Edge) {
        debug_assert_eq!(
            {
                let (a, b) = self.edges[id.0].endpoints();
                (a.min(b), a.max(b))
            },
            {
                let (a, b) = edge.endpoints();
                (a.min(b), a.max(b))
            }
        );
        self.note_bond(edge.bond());
        self.edges[id.0] = edge;
    }

    pub fn set_bond(&mut self, id: EdgeId, bond: Bond) {
        let edge = self.edges[id.0].with_bond(bond);
        self.replace(id, edge);
    }

    fn note_bond(&mut self, bond: Bond) {
        match bond {
            Bond::Aromatic => self.flags |= Graph::HAS_AROM,
            Bond::Up | Bond::Down => self.flags |= Graph::HAS_BOND_STEREO,
            _ => {}
        }
    }

    /// Number of vertices.
    pub fn order(&self) -> usize {
        self.atoms.len()
    }

    /// Number of edges.
    pub fn size(&self) -> usize {
        self.edges.len()
    }

    pub fn atom(&self, v: usize) -> &Atom {
        &self.atoms[v]
    }

    pub fn set_atom(&mut self, v: usize, atom: Atom) {
        if atom.aromatic() {
            self.flags |= Graph::HAS_AROM;
        }
        self.atoms[v] = atom;
    }

    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    pub fn degree(&self, v: usize) -> usize {
        self.adjacency[v].len()
    }

    pub fn edge(&self, id: EdgeId) -> &Edge {
        &self.edges[id.0]
    }

    /// The `j`th edge incident to `v`.
    pub fn edge_at(&self, v: usize, j: usize) -> &Edge {
        &self.edges[self.adjacency[v][j].0]
    }

    pub fn edge_ids_of(&self, v: usize) -> &[EdgeId] {
        &self.adjacency[v]
    }

    pub fn edges_of(&self, v: usize) -> impl Iterator<Item = &Edge> + '_ {
        self.adjacency[v].iter().map(move |id| &self.edges[id.0])
    }

    pub fn neighbors(&self, v: usize) -> impl Iterator<Item = usize> + '_ {
        self.edges_of(v).map(move |e| e.other(v))
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn edge_between(&self, u: usize, v: usize) -> Option<EdgeId> {
        self.adjacency[u]
            .iter()
            .copied()
            .find(|id| self.edges[id.0].other(u) == v)
    }

    /// Sum of bond orders over the edges incident to `v`.
    pub fn bonded_valence(&self, v: usize) -> u8 {
        self.edges_of(v)
            .map(|e| e.bond().bond_order())
            .fold(0u8, u8::saturating_add)
    }

    /// Hydrogens implied at `v`: the bracket count, or the default-valence
    /// completion for subset atoms.
    pub fn implicit_h_count(&self, v: usize) -> u8 {
        match &self.atoms[v] {
            Atom::Bracket(b) => b.hydrogens,
            Atom::Aliphatic(e) => e.implicit_hydrogens(self.bonded_valence(v), false),
            Atom::Aromatic(e) => e.implicit_hydrogens(self.bonded_valence(v), true),
        }
    }

    pub fn topology(&self, v: usize) -> Option<&Topology> {
        self.topologies[v].as_ref()
    }

    /// Stores `topology` at its focus, replacing any previous one.
    pub fn add_topology(&mut self, topology: Topology) {
        let focus = topology.focus();
        self.topologies[focus] = Some(topology);
    }

    pub fn clear_topology(&mut self, v: usize) -> Option<Topology> {
        self.topologies[v].take()
    }

    pub fn topologies(&self) -> impl Iterator<Item = &Topology> + '_ {
        self.topologies.iter().flatten()
    }

    /// The subset of `mask` that is set.
    pub fn flags(&self, mask: u8) -> u8 {
        self.flags & mask
    }

    pub fn add_flags(&mut self, mask: u8) {
        self.flags |= mask;
    }

    pub fn remove_flags(&mut self, mask: u8) {
        self.flags &= !mask;
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn set_title(&mut self, title: Option<String>) {
        self.title = title;
    }

    /// A Kekulé copy: every aromatic atom made aliphatic with explicit
    /// alternating double bonds.
    pub fn kekule(&self) -> Result<Graph, KekulizeError> {
        let mut g = self.clone();
        kekulise(&mut g)?;
        Ok(g)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atom::BracketAtom;
    use crate::element::Element;

    fn carbon() -> Atom {
        Atom::Aliphatic(Element::C)
    }

    #[test]
    fn edge_other_endpoint() {
        let e = Edge::new(3, 7, Bond::Up);
        assert_eq!(e.other(3), 7);
        assert_eq!(e.other(7), 3);
        assert_eq!(e.endpoints(), (3, 7));
        assert_eq!(e.bond_from(3), Bond::Up);
        assert_eq!(e.bond_from(7), Bond::Down);
    }

    #[test]
    fn adjacency_keeps_insertion_order() {
        let mut g = Graph::new();
        for _ in 0..4 {
            g.add_atom(carbon());
        }
        g.add_edge(Edge::new(0, 2, Bond::Implicit));
        g.add_edge(Edge::new(1, 0, Bond::Double));
        g.add_edge(Edge::new(0, 3, Bond::Implicit));
        let order: Vec<usize> = g.neighbors(0).collect();
        assert_eq!(order, vec![2, 1, 3]);
        assert_eq!(g.degree(0), 3);
        assert_eq!(g.edge_at(0, 1).bond(), Bond::Double);
        assert_eq!(g.bonded_valence(0), 4);
        assert_eq!(g.implicit_h_count(0), 0);
        assert_eq!(g.implicit_h_count(2), 3);
    }

    #[test]
    fn insert_edge_at_first_endpoint() {
        let mut g = Graph::new();
        for _ in 0..4 {
            g.add_atom(carbon());
        }
        g.add_edge(Edge::new(0, 1, Bond::Implicit));
        g.add_edge(Edge::new(0, 2, Bond::Implicit));
        let id = g.insert_edge_at(Edge::new(0, 3, Bond::Double), 1);
        assert_eq!(g.neighbors(0).collect::<Vec<_>>(), vec![1, 3, 2]);
        assert_eq!(g.edge_ids_of(3), &[id]);
        assert_eq!(g.edge_at(0, 1).bond(), Bond::Double);

        g.insert_edge_at(Edge::new(1, 2, Bond::Implicit), 9);
        assert_eq!(g.neighbors(1).collect::<Vec<_>>(), vec![0, 2]);
    }

    #[test]
    fn replace_keeps_position() {
        let mut g = Graph::new();
        for _ in 0..3 {
            g.add_atom(carbon());
        }
        g.add_edge(Edge::new(0, 1, Bond::Implicit));
        let id = g.add_edge(Edge::new(1, 2, Bond::Implicit));
        g.set_bond(id, Bond::Double);
        assert_eq!(g.edge_at(1, 1).bond(), Bond::Double);
        assert_eq!(g.edge_between(2, 1), Some(id));
        assert_eq!(g.edge_between(0, 2), None);
    }

    #[test]
    fn flags_track_aromatic_and_directional_labels() {
        let mut g = Graph::new();
        g.add_atom(carbon());
        g.add_atom(carbon());
        assert_eq!(g.flags(Graph::HAS_AROM), 0);
        g.add_edge(Edge::new(0, 1, Bond::Up));
        assert_ne!(g.flags(Graph::HAS_BOND_STEREO), 0);
        g.add_atom(Atom::Aromatic(Element::C));
        assert_ne!(g.flags(Graph::HAS_AROM), 0);
        g.remove_flags(Graph::HAS_AROM);
        assert_eq!(g.flags(Graph::HAS_AROM | Graph::HAS_ATOM_STEREO), 0);
    }

    #[test]
    fn bracket_hydrogens_are_explicit() {
        let mut g = Graph::new();
        let n = g.add_atom(Atom::Bracket(BracketAtom {
            hydrogens: 2,
            charge: 1,
            ..BracketAtom::new(Element::N)
        }));
        assert_eq!(g.implicit_h_count(n), 2);
    }
}
