use std::collections::HashMap;

use super::error::WriteError;
use crate::atom::Atom;
use crate::bond::Bond;
use crate::configuration::{Configuration, ConfigurationType};
use crate::element::Element;
use crate::graph::Graph;

/// How ring-closure numbers are handed out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RingNumbering {
    /// Reuse the lowest number not currently open.
    #[default]
    LowestAvailable,
    /// Count upwards, wrapping from 99 back to 1 and skipping open numbers.
    Increasing,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteOptions {
    pub ring_numbering: RingNumbering,
    /// Append the graph title, if any, after a space.
    pub title: bool,
}

impl Default for WriteOptions {
    fn default() -> Self {
        WriteOptions {
            ring_numbering: RingNumbering::LowestAvailable,
            title: true,
        }
    }
}

pub fn to_smiles(graph: &Graph) -> Result<String, WriteError> {
    to_smiles_with(graph, &WriteOptions::default())
}

/// Writes `graph` depth-first from its lowest-numbered vertex, and from the
/// lowest unvisited vertex of each further component. Bonds are followed in
/// the order they were added, so the output of a parsed graph reproduces the
/// input's atom order and writing is idempotent through a parse.
pub fn to_smiles_with(graph: &Graph, options: &WriteOptions) -> Result<String, WriteError> {
    let traversal = Traversal::new(graph);
    let configurations = traversal.configurations()?;
    let mut rings = RingNumbers::new(options.ring_numbering);
    let mut out = String::with_capacity(graph.order() * 2);

    for (i, &root) in traversal.roots.iter().enumerate() {
        if i > 0 {
            out.push('.');
        }
        traversal.write_component(&mut out, root, &configurations, &mut rings)?;
    }

    if options.title {
        if let Some(title) = graph.title() {
            out.push(' ');
            out.push_str(title);
        }
    }
    Ok(out)
}

/// The depth-first spanning forest and the ring bonds left over.
struct Traversal<'a> {
    graph: &'a Graph,
    roots: Vec<usize>,
    parent: Vec<Option<usize>>,
    children: Vec<Vec<usize>>,
    /// Ring bonds each vertex opens, partner in visit order.
    opens: Vec<Vec<usize>>,
    /// Ring bonds each vertex closes back to an ancestor.
    closes: Vec<Vec<usize>>,
}

impl<'a> Traversal<'a> {
    fn new(graph: &'a Graph) -> Traversal<'a> {
        let n = graph.order();
        let mut traversal = Traversal {
            graph,
            roots: Vec::new(),
            parent: vec![None; n],
            children: vec![Vec::new(); n],
            opens: vec![Vec::new(); n],
            closes: vec![Vec::new(); n],
        };
        // bonds in the order they were read, so a parsed graph keeps its
        // branches; ring closures then fall out as back edges
        let incident: Vec<Vec<usize>> = (0..n)
            .map(|v| {
                let mut ids = graph.edge_ids_of(v).to_vec();
                ids.sort_unstable();
                ids.into_iter().map(|id| graph.edge(id).other(v)).collect()
            })
            .collect();
        let mut rank: Vec<Option<usize>> = vec![None; n];
        let mut counter = 0;

        for start in 0..n {
            if rank[start].is_some() {
                continue;
            }
            traversal.roots.push(start);
            rank[start] = Some(counter);
            counter += 1;
            // (vertex, next adjacency slot)
            let mut stack = vec![(start, 0usize)];
            while let Some(top) = stack.last_mut() {
                let (v, j) = *top;
                let Some(&w) = incident[v].get(j) else {
                    stack.pop();
                    continue;
                };
                top.1 += 1;
                if traversal.parent[v] == Some(w) {
                    continue;
                }
                match rank[w] {
                    None => {
                        rank[w] = Some(counter);
                        counter += 1;
                        traversal.parent[w] = Some(v);
                        traversal.children[v].push(w);
                        stack.push((w, 0));
                    }
                    Some(rw) if Some(rw) < rank[v] => {
                        traversal.opens[w].push(v);
                        traversal.closes[v].push(w);
                    }
                    Some(_) => {}
                }
            }
        }
        traversal
    }

    /// Neighbours of `v` in the order they are written.
    fn written_order(&self, v: usize) -> Vec<usize> {
        let mut order = Vec::with_capacity(self.graph.degree(v) + 1);
        order.extend(self.parent[v]);
        order.extend(&self.closes[v]);
        order.extend(&self.opens[v]);
        order.extend(&self.children[v]);
        order
    }

    /// `written_order(v)` with `v` itself standing in for an implicit
    /// neighbour, where a reader would place it.
    fn carrier_order(&self, v: usize, implicit: bool) -> Vec<usize> {
        let mut order = self.written_order(v);
        if implicit {
            let at = if self.parent[v].is_some() { 1 } else { 0 };
            order.insert(at.min(order.len()), v);
        }
        order
    }

    /// Every topology re-expressed against the written neighbour order.
    fn configurations(&self) -> Result<Vec<Configuration>, WriteError> {
        let mut configurations = vec![Configuration::Unknown; self.graph.order()];
        for topology in self.graph.topologies() {
            let focus = topology.focus();
            let carriers = topology.carriers();
            let order = if topology.config_type() == ConfigurationType::ExtendedTetrahedral {
                let mut order = Vec::with_capacity(4);
                for terminal in self.written_order(focus) {
                    let mut around = self.carrier_order(terminal, carriers.contains(&terminal));
                    around.retain(|&x| x != focus);
                    order.extend(around);
                }
                order
            } else {
                self.carrier_order(focus, carriers.contains(&focus))
            };
            let configuration = topology
                .configuration_for(&order)
                .map_err(|source| WriteError::Stereo { focus, source })?;
            configurations[focus] = configuration.shorthand();
        }
        Ok(configurations)
    }

    /// Writes the component rooted at `root`. Branches are held on an
    /// explicit stack so chain length is not limited by the call stack.
    fn write_component(
        &self,
        out: &mut String,
        root: usize,
        configurations: &[Configuration],
        rings: &mut RingNumbers,
    ) -> Result<(), WriteError> {
        self.write_vertex(out, root, configurations, rings)?;
        // (vertex, next child, whether it opened a branch)
        let mut stack = vec![(root, 0usize, false)];
        while let Some(top) = stack.last_mut() {
            let (v, i, branched) = *top;
            let children = &self.children[v];
            let Some(&w) = children.get(i) else {
                stack.pop();
                if branched {
                    out.push(')');
                }
                continue;
            };
            top.1 += 1;
            let branch = i + 1 < children.len();
            if branch {
                out.push('(');
            }
            out.push_str(bond_token(self.graph, v, w));
            self.write_vertex(out, w, configurations, rings)?;
            stack.push((w, 0, branch));
        }
        Ok(())
    }

    /// The atom at `v` followed by its ring closures and ring openings.
    fn write_vertex(
        &self,
        out: &mut String,
        v: usize,
        configurations: &[Configuration],
        rings: &mut RingNumbers,
    ) -> Result<(), WriteError> {
        write_atom(out, self.graph, v, configurations[v]);

        for &w in &self.closes[v] {
            if let Some(rnum) = rings.close(w, v) {
                write_ring_number(out, rnum);
            }
        }
        for &w in &self.opens[v] {
            let rnum = rings.open(v, w)?;
            out.push_str(bond_token(self.graph, v, w));
            write_ring_number(out, rnum);
        }
        Ok(())
    }
}

struct RingNumbers {
    policy: RingNumbering,
    in_use: [bool; 100],
    next: u32,
    /// (opening vertex, closing vertex) → number
    assigned: HashMap<(usize, usize), u32>,
}

impl RingNumbers {
    fn new(policy: RingNumbering) -> RingNumbers {
        RingNumbers {
            policy,
            in_use: [false; 100],
            next: 1,
            assigned: HashMap::new(),
        }
    }

    fn allocate(&mut self) -> Result<u32, WriteError> {
        let rnum = match self.policy {
            RingNumbering::LowestAvailable => (1..=99).find(|&n| !self.in_use[n as usize]),
            RingNumbering::Increasing => (0..99)
                .map(|k| (self.next - 1 + k) % 99 + 1)
                .find(|&n| !self.in_use[n as usize]),
        }
        .ok_or(WriteError::RingNumbersExhausted)?;
        self.in_use[rnum as usize] = true;
        self.next = rnum % 99 + 1;
        Ok(rnum)
    }

    fn open(&mut self, from: usize, to: usize) -> Result<u32, WriteError> {
        let rnum = self.allocate()?;
        self.assigned.insert((from, to), rnum);
        Ok(rnum)
    }

    fn close(&mut self, from: usize, to: usize) -> Option<u32> {
        let rnum = self.assigned.remove(&(from, to))?;
        self.in_use[rnum as usize] = false;
        Some(rnum)
    }
}

fn write_ring_number(out: &mut String, rnum: u32) {
    if rnum < 10 {
        out.push(char::from(b'0' + rnum as u8));
    } else {
        out.push('%');
        out.push_str(&rnum.to_string());
    }
}

/// The symbol for the bond from `u` to `v`. Single bonds between aromatic
/// atoms must be explicit; aromatic bonds between them must not.
fn bond_token(graph: &Graph, u: usize, v: usize) -> &'static str {
    let Some(id) = graph.edge_between(u, v) else {
        return "";
    };
    let both_aromatic = graph.atom(u).aromatic() && graph.atom(v).aromatic();
    match graph.edge(id).bond_from(u) {
        Bond::Single if both_aromatic => "-",
        Bond::Aromatic if !both_aromatic => ":",
        Bond::Single | Bond::Aromatic | Bond::Implicit | Bond::Dot => "",
        other => other.symbol(),
    }
}

fn write_atom(out: &mut String, graph: &Graph, v: usize, configuration: Configuration) {
    match graph.atom(v) {
        Atom::Aliphatic(e) if configuration == Configuration::Unknown => {
            out.push_str(&subset_symbol(*e, false))
        }
        Atom::Aromatic(e) if configuration == Configuration::Unknown => {
            out.push_str(&subset_symbol(*e, true))
        }
        Atom::Aliphatic(e) | Atom::Aromatic(e) => write_bracket_atom(
            out,
            None,
            *e,
            graph.atom(v).aromatic(),
            configuration,
            graph.implicit_h_count(v),
            0,
            0,
        ),
        Atom::Bracket(b) => match &b.label {
            Some(label) => {
                out.push('[');
                out.push_str(label);
                out.push(']');
            }
            None => write_bracket_atom(
                out,
                b.isotope,
                b.element,
                b.aromatic,
                configuration,
                b.hydrogens,
                b.charge,
                b.class,
            ),
        },
    }
}

fn subset_symbol(element: Element, aromatic: bool) -> String {
    match element {
        Element::Unknown => "*".to_string(),
        e if aromatic => e.symbol().to_ascii_lowercase(),
        e => e.symbol().to_string(),
    }
}

#[allow(clippy::too_many_arguments)]
fn write_bracket_atom(
    out: &mut String,
    isotope: Option<u16>,
    element: Element,
    aromatic: bool,
    configuration: Configuration,
    hydrogens: u8,
    charge: i8,
    class: u32,
) {
    out.push('[');
    if let Some(iso) = isotope {
        out.push_str(&iso.to_string());
    }
    out.push_str(&subset_symbol(element, aromatic));
    out.push_str(configuration.symbol());
    match hydrogens {
        0 => {}
        1 => out.push('H'),
        h => {
            out.push('H');
            out.push_str(&h.to_string());
        }
    }
    match charge {
        0 => {}
        1 => out.push('+'),
        -1 => out.push('-'),
        c if c > 0 => {
            out.push('+');
            out.push_str(&c.to_string());
        }
        c => out.push_str(&c.to_string()),
    }
    if class > 0 {
        out.push(':');
        out.push_str(&class.to_string());
    }
    out.push(']');
}
