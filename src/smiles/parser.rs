use std::collections::HashMap;

use log::warn;

use super::bracket::{self, BracketContent};
use super::buffer::CharBuffer;
use super::error::{ErrorKind, SmilesError, Warning};
use super::{ParseOptions, Parsed};
use crate::atom::{Atom, BracketAtom};
use crate::bond::Bond;
use crate::configuration::{Configuration, ConfigurationType};
use crate::element::Element;
use crate::graph::{Edge, Graph};
use crate::kekulize::kekulise;
use crate::topology::Topology;

/// One written neighbour of an atom. Ring bonds hold their number until the
/// matching closure names the partner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Vertex(usize),
    Ring(u32),
}

#[derive(Debug, Clone, Copy)]
struct RingBond {
    vertex: usize,
    bond: Bond,
    pos: usize,
}

pub(crate) fn parse(input: &str, options: &ParseOptions) -> Result<Parsed, SmilesError> {
    let mut parser = Parser::new(input, options.strict);
    parser.read_smiles()?;
    if parser.graph.order() == 0 {
        return Err(SmilesError::EmptyInput);
    }
    parser.resolve_stereo()?;
    parser.check_directional_bonds()?;

    let Parser {
        mut graph,
        warnings,
        ..
    } = parser;
    if options.kekulise && graph.flags(Graph::HAS_AROM) != 0 {
        kekulise(&mut graph)?;
    }
    Ok(Parsed { graph, warnings })
}

struct Parser<'a> {
    buf: CharBuffer<'a>,
    strict: bool,
    graph: Graph,
    /// Atoms new bonds attach to; one entry per open branch plus the main chain.
    stack: Vec<usize>,
    /// Offset of each open `(` and the atom count when it was opened.
    branches: Vec<(usize, usize)>,
    bond: Bond,
    bond_pos: usize,
    rings: HashMap<u32, RingBond>,
    /// Neighbours of each atom in written order.
    arrangement: Vec<Vec<Slot>>,
    /// Whether each atom begins a component, so that nothing precedes it.
    starts: Vec<bool>,
    positions: Vec<usize>,
    stereo: Vec<(usize, Configuration)>,
    warnings: Vec<Warning>,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str, strict: bool) -> Parser<'a> {
        let mut buf = CharBuffer::new(input);
        let leading = input.len() - input.trim_start().len();
        buf.set_position(leading);
        Parser {
            buf,
            strict,
            graph: Graph::with_capacity(input.len()),
            stack: Vec::new(),
            branches: Vec::new(),
            bond: Bond::Implicit,
            bond_pos: 0,
            rings: HashMap::new(),
            arrangement: Vec::with_capacity(input.len()),
            starts: Vec::with_capacity(input.len()),
            positions: Vec::with_capacity(input.len()),
            stereo: Vec::new(),
            warnings: Vec::new(),
        }
    }

    fn error(&self, kind: ErrorKind, pos: usize) -> SmilesError {
        SmilesError::Syntax {
            kind,
            input: self.buf.text().to_string(),
            pos,
        }
    }

    fn warn(&mut self, kind: ErrorKind, position: usize) {
        let warning = Warning { kind, position };
        warn!("{warning}");
        self.warnings.push(warning);
    }

    /// Fails when strict, otherwise records a warning and carries on.
    fn strict_or_warn(&mut self, kind: ErrorKind, pos: usize) -> Result<(), SmilesError> {
        if self.strict {
            Err(self.error(kind, pos))
        } else {
            self.warn(kind, pos);
            Ok(())
        }
    }

    fn read_smiles(&mut self) -> Result<(), SmilesError> {
        while let Some(c) = self.buf.peek() {
            let pos = self.buf.position();
            match c {
                b'*' | b'B' | b'C' | b'N' | b'O' | b'P' | b'S' | b'F' | b'I' => {
                    self.buf.get();
                    let element = match c {
                        b'B' if self.buf.get_if(b'r') => Element::Br,
                        b'C' if self.buf.get_if(b'l') => Element::Cl,
                        _ => subset_element(c),
                    };
                    self.add_atom(Atom::Aliphatic(element), pos);
                }
                b'b' | b'c' | b'n' | b'o' | b'p' | b's' => {
                    self.buf.get();
                    self.add_atom(Atom::Aromatic(subset_element(c)), pos);
                }
                b'H' | b'D' | b'T' => {
                    self.buf.get();
                    self.strict_or_warn(ErrorKind::HydrogenShorthand(c as char), pos)?;
                    let isotope = match c {
                        b'D' => Some(2),
                        b'T' => Some(3),
                        _ => None,
                    };
                    let atom = BracketAtom {
                        isotope,
                        ..BracketAtom::new(Element::H)
                    };
                    self.add_atom(Atom::Bracket(atom), pos);
                }
                b'[' => {
                    self.buf.get();
                    self.bracket_atom(pos)?;
                }
                b'0'..=b'9' => {
                    self.buf.get();
                    self.ring(u32::from(c - b'0'), pos)?;
                }
                b'%' => {
                    self.buf.get();
                    let rnum = self.ring_number(pos)?;
                    self.ring(rnum, pos)?;
                }
                b'(' => {
                    self.buf.get();
                    let Some(&top) = self.stack.last() else {
                        return Err(self.error(ErrorKind::BranchBeforeAtom, pos));
                    };
                    if self.bond != Bond::Implicit {
                        return Err(self.error(ErrorKind::DanglingBond, self.bond_pos));
                    }
                    self.stack.push(top);
                    self.branches.push((pos, self.graph.order()));
                }
                b')' => {
                    self.buf.get();
                    if self.stack.len() < 2 {
                        return Err(self.error(ErrorKind::UnopenedBranch, pos));
                    }
                    if self.bond != Bond::Implicit {
                        return Err(self.error(ErrorKind::DanglingBond, self.bond_pos));
                    }
                    if let Some((_, order)) = self.branches.pop() {
                        if order == self.graph.order() {
                            return Err(self.error(ErrorKind::EmptyBranch, pos));
                        }
                    }
                    self.stack.pop();
                }
                b' ' | b'\t' | b'\n' | b'\r' => {
                    self.read_title();
                    break;
                }
                _ => {
                    let Some(bond) = Bond::from_symbol(c) else {
                        return Err(self.error(ErrorKind::UnexpectedChar(self.buf.char_at(pos)), pos));
                    };
                    self.buf.get();
                    if self.stack.is_empty() {
                        return Err(self.error(ErrorKind::UnexpectedChar(c as char), pos));
                    }
                    if self.bond != Bond::Implicit {
                        return Err(self.error(ErrorKind::RepeatedBond, pos));
                    }
                    self.bond = bond;
                    self.bond_pos = pos;
                }
            }
        }

        if let Some(&(pos, _)) = self.branches.last() {
            return Err(self.error(ErrorKind::UnclosedBranch, pos));
        }
        if self.bond != Bond::Implicit {
            return Err(self.error(ErrorKind::DanglingBond, self.bond_pos));
        }
        if let Some((&rnum, ring)) = self.rings.iter().min_by_key(|(_, r)| r.pos) {
            return Err(self.error(ErrorKind::UnclosedRing(rnum), ring.pos));
        }
        Ok(())
    }

    fn read_title(&mut self) {
        let title = self.buf.rest().lines().next().unwrap_or("").trim();
        if !title.is_empty() {
            self.graph.set_title(Some(title.to_string()));
        }
    }

    fn add_atom(&mut self, atom: Atom, pos: usize) -> usize {
        let u = self.graph.add_atom(atom);
        self.arrangement.push(Vec::new());
        self.positions.push(pos);
        let previous = self.stack.last().copied();
        match previous {
            Some(p) if self.bond != Bond::Dot => {
                self.graph.add_edge(Edge::new(p, u, self.bond));
                self.arrangement[p].push(Slot::Vertex(u));
                self.arrangement[u].push(Slot::Vertex(p));
                self.starts.push(false);
            }
            _ => self.starts.push(true),
        }
        match self.stack.last_mut() {
            Some(top) => *top = u,
            None => self.stack.push(u),
        }
        self.bond = Bond::Implicit;
        u
    }

    /// Called after the opening `[` at `pos` has been consumed.
    fn bracket_atom(&mut self, pos: usize) -> Result<(), SmilesError> {
        let start = self.buf.position();
        let content = match bracket::parse_bracket_atom(&mut self.buf, self.strict) {
            Ok(content) => content,
            Err((ErrorKind::UnclosedBracket, _)) => {
                return Err(self.error(ErrorKind::UnclosedBracket, pos));
            }
            Err((kind, at)) if self.strict => return Err(self.error(kind, at)),
            Err((kind, at)) => {
                self.buf.set_position(start);
                let Some(label) = bracket::read_label(&mut self.buf) else {
                    return Err(self.error(ErrorKind::UnclosedBracket, pos));
                };
                if label.is_empty() {
                    return Err(self.error(kind, at));
                }
                self.warn(ErrorKind::UnrecognisedBracketAtom(label.to_string()), pos);
                BracketContent {
                    atom: Atom::Bracket(BracketAtom::labelled(label)),
                    configuration: Configuration::Unknown,
                    abnormal_aromatic: None,
                }
            }
        };

        if let Some(symbol) = content.abnormal_aromatic {
            self.warn(ErrorKind::AbnormalAromatic(symbol), start);
        }
        let u = self.add_atom(content.atom, pos);
        if content.configuration != Configuration::Unknown {
            self.stereo.push((u, content.configuration));
        }
        Ok(())
    }

    /// The number after `%`: two digits, or when not strict a single digit
    /// or any number in parentheses.
    fn ring_number(&mut self, pos: usize) -> Result<u32, SmilesError> {
        if self.buf.get_if(b'(') {
            if self.strict {
                return Err(self.error(ErrorKind::InvalidRingNumber, pos));
            }
            let rnum = self.buf.digits().parse::<u32>().ok();
            return match rnum {
                Some(rnum) if self.buf.get_if(b')') => Ok(rnum),
                _ => Err(self.error(ErrorKind::InvalidRingNumber, pos)),
            };
        }

        let Some(first) = self.buf.peek().filter(u8::is_ascii_digit) else {
            return Err(self.error(ErrorKind::InvalidRingNumber, pos));
        };
        self.buf.get();
        match self.buf.peek().filter(u8::is_ascii_digit) {
            Some(second) => {
                self.buf.get();
                Ok(u32::from(first - b'0') * 10 + u32::from(second - b'0'))
            }
            None => {
                self.strict_or_warn(ErrorKind::InvalidRingNumber, pos)?;
                Ok(u32::from(first - b'0'))
            }
        }
    }

    /// Opens ring `rnum` at the current atom, or closes it with a new edge
    /// from the opening atom.
    fn ring(&mut self, rnum: u32, pos: usize) -> Result<(), SmilesError> {
        let Some(&u) = self.stack.last() else {
            return Err(self.error(ErrorKind::RingBeforeAtom, pos));
        };
        if self.bond == Bond::Dot {
            return Err(self.error(ErrorKind::DanglingBond, self.bond_pos));
        }
        let bond = std::mem::take(&mut self.bond);

        let Some(open) = self.rings.remove(&rnum) else {
            self.rings.insert(
                rnum,
                RingBond {
                    vertex: u,
                    bond,
                    pos,
                },
            );
            self.arrangement[u].push(Slot::Ring(rnum));
            return Ok(());
        };

        let v = open.vertex;
        if v == u {
            return Err(self.error(ErrorKind::SelfLoop, pos));
        }
        if self.graph.edge_between(v, u).is_some() {
            return Err(self.error(ErrorKind::DuplicateBond, pos));
        }
        let bond = self.ring_bond(open.bond, bond, pos)?;
        // adjacency holds the resolved slots, so the closure goes in after
        // the vertices written before its digit
        let slot = self.arrangement[v]
            .iter()
            .position(|s| *s == Slot::Ring(rnum))
            .unwrap_or(self.arrangement[v].len());
        let at = self.arrangement[v][..slot]
            .iter()
            .filter(|s| matches!(s, Slot::Vertex(_)))
            .count();
        self.graph.insert_edge_at(Edge::new(v, u, bond), at);
        if let Some(s) = self.arrangement[v].get_mut(slot) {
            *s = Slot::Vertex(u);
        }
        self.arrangement[u].push(Slot::Vertex(v));
        Ok(())
    }

    /// The label of a ring bond, relative to its opening atom, from the
    /// symbols written at either end.
    fn ring_bond(&mut self, opener: Bond, closer: Bond, pos: usize) -> Result<Bond, SmilesError> {
        let closer = closer.inverse();
        if opener == closer || closer == Bond::Implicit {
            return Ok(opener);
        }
        if opener == Bond::Implicit {
            return Ok(closer);
        }
        let kind = ErrorKind::RingBondConflict(opener, closer);
        if opener.is_directional() && closer.is_directional() {
            self.strict_or_warn(kind, pos)?;
            return Ok(Bond::Implicit);
        }
        Err(self.error(kind, pos))
    }

    fn neighbours(&self, u: usize) -> Vec<usize> {
        self.arrangement[u]
            .iter()
            .filter_map(|slot| match slot {
                Slot::Vertex(v) => Some(*v),
                Slot::Ring(_) => None,
            })
            .collect()
    }

    /// Turns each stereo mark into a topology over the atom's written
    /// neighbours. Marks that cannot be satisfied are dropped with a warning
    /// unless strict.
    fn resolve_stereo(&mut self) -> Result<(), SmilesError> {
        for (u, configuration) in std::mem::take(&mut self.stereo) {
            match self.topology_for(u, configuration) {
                Ok(topology) => {
                    let flag = match topology.config_type() {
                        ConfigurationType::ExtendedTetrahedral => Graph::HAS_EXT_STEREO,
                        _ => Graph::HAS_ATOM_STEREO,
                    };
                    self.graph.add_flags(flag);
                    self.graph.add_topology(topology);
                }
                Err(kind) => self.strict_or_warn(kind, self.positions[u])?,
            }
        }
        Ok(())
    }

    fn topology_for(&self, u: usize, configuration: Configuration) -> Result<Topology, ErrorKind> {
        let kind = configuration.config_type();
        let allene = self.allene_terminals(u);

        if kind == ConfigurationType::ExtendedTetrahedral
            || (kind == ConfigurationType::Implicit && allene.is_some())
        {
            let (a, b) = allene.ok_or(ErrorKind::NotAnAllene)?;
            let mut carriers = Vec::with_capacity(4);
            for terminal in [a, b] {
                let mut around = self.neighbours(terminal);
                if around.len() == 2 {
                    let at = if self.starts[terminal] { 0 } else { 1 };
                    around.insert(at, terminal);
                }
                around.retain(|&x| x != u);
                carriers.extend(around);
            }
            return self.topology(u, carriers, configuration, ConfigurationType::ExtendedTetrahedral);
        }

        let kind = match kind {
            ConfigurationType::Implicit => ConfigurationType::Tetrahedral,
            other => other,
        };
        let mut carriers = self.neighbours(u);
        if carriers.len() + 1 == kind.carrier_count() {
            // an implicit hydrogen or lone pair sits where the atom was written
            let at = if self.starts[u] { 0 } else { 1 };
            carriers.insert(at.min(carriers.len()), u);
        }
        self.topology(u, carriers, configuration, kind)
    }

    fn topology(
        &self,
        u: usize,
        carriers: Vec<usize>,
        configuration: Configuration,
        kind: ConfigurationType,
    ) -> Result<Topology, ErrorKind> {
        if carriers.len() != kind.carrier_count() {
            return Err(ErrorKind::StereoCarriers {
                expected: kind.carrier_count(),
                found: carriers.len(),
            });
        }
        let configuration = configuration
            .resolve(kind)
            .ok_or(ErrorKind::InvalidChirality)?;
        Topology::new(u, carriers, configuration).map_err(ErrorKind::Stereo)
    }

    /// The two neighbours of a cumulated `=X=` centre, in written order.
    fn allene_terminals(&self, u: usize) -> Option<(usize, usize)> {
        let around = self.neighbours(u);
        let [a, b] = around[..] else {
            return None;
        };
        let double = |x: usize| {
            self.graph
                .edge_between(u, x)
                .is_some_and(|id| self.graph.edge(id).bond() == Bond::Double)
        };
        (double(a) && double(b)).then_some((a, b))
    }

    /// Each end of a double bond may carry at most one `/` and one `\`
    /// relative to itself.
    fn check_directional_bonds(&mut self) -> Result<(), SmilesError> {
        if self.graph.flags(Graph::HAS_BOND_STEREO) == 0 {
            return Ok(());
        }
        let mut conflicts = Vec::new();
        for edge in self.graph.edges() {
            if edge.bond() != Bond::Double {
                continue;
            }
            let (a, b) = edge.endpoints();
            for x in [a, b] {
                let (mut up, mut down) = (0, 0);
                for e in self.graph.edges_of(x) {
                    match e.bond_from(x) {
                        Bond::Up => up += 1,
                        Bond::Down => down += 1,
                        _ => {}
                    }
                }
                if up > 1 || down > 1 {
                    conflicts.push(x);
                }
            }
        }
        conflicts.sort_unstable();
        conflicts.dedup();
        for x in conflicts {
            self.strict_or_warn(ErrorKind::ConflictingDirectionalBonds, self.positions[x])?;
        }
        Ok(())
    }
}

fn subset_element(c: u8) -> Element {
    match c.to_ascii_uppercase() {
        b'B' => Element::B,
        b'C' => Element::C,
        b'N' => Element::N,
        b'O' => Element::O,
        b'P' => Element::P,
        b'S' => Element::S,
        b'F' => Element::F,
        b'I' => Element::I,
        _ => Element::Unknown,
    }
}
