use petgraph::graph::{NodeIndex, UnGraph};
use thiserror::Error;

use crate::atom::Atom;
use crate::bond::Bond;
use crate::graph::{Edge, Graph};

/// Vertex sets of the connected components, each sorted, in order of their
/// lowest vertex.
pub fn connected_components(graph: &Graph) -> Vec<Vec<usize>> {
    let n = graph.order();
    let mut visited = vec![false; n];
    let mut components = Vec::new();
    for start in 0..n {
        if visited[start] {
            continue;
        }
        let mut component = Vec::new();
        let mut stack = vec![start];
        while let Some(current) = stack.pop() {
            if visited[current] {
                continue;
            }
            visited[current] = true;
            component.push(current);
            for neighbor in graph.neighbors(current) {
                if !visited[neighbor] {
                    stack.push(neighbor);
                }
            }
        }
        component.sort_unstable();
        components.push(component);
    }
    components
}

/// For each edge, whether it lies on a cycle (is not a bridge).
pub fn cyclic_edges(graph: &Graph) -> Vec<bool> {
    let n = graph.order();
    let mut cyclic = vec![true; graph.size()];
    let mut disc: Vec<Option<usize>> = vec![None; n];
    let mut low = vec![0usize; n];
    let mut time = 0;

    for start in 0..n {
        if disc[start].is_some() {
            continue;
        }
        disc[start] = Some(time);
        low[start] = time;
        time += 1;
        // (vertex, edge we arrived by, next adjacency slot)
        let mut stack = vec![(start, None, 0usize)];
        while let Some(top) = stack.last_mut() {
            let (v, arrived_by) = (top.0, top.1);
            if top.2 < graph.degree(v) {
                let id = graph.edge_ids_of(v)[top.2];
                top.2 += 1;
                if Some(id) == arrived_by {
                    continue;
                }
                let w = graph.edge(id).other(v);
                match disc[w] {
                    Some(d) => low[v] = low[v].min(d),
                    None => {
                        disc[w] = Some(time);
                        low[w] = time;
                        time += 1;
                        stack.push((w, Some(id), 0));
                    }
                }
            } else {
                stack.pop();
                if let (Some(&(parent, _, _)), Some(id)) = (stack.last(), arrived_by) {
                    low[parent] = low[parent].min(low[v]);
                    if disc[parent].is_some_and(|d| low[v] > d) {
                        cyclic[id.0] = false;
                    }
                }
            }
        }
    }
    cyclic
}

/// For each vertex, whether it lies on a cycle.
pub fn cyclic_vertices(graph: &Graph) -> Vec<bool> {
    let edges = cyclic_edges(graph);
    (0..graph.order())
        .map(|v| graph.edge_ids_of(v).iter().any(|id| edges[id.0]))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PermuteError {
    #[error("permutation length {got} != vertex count {expected}")]
    LengthMismatch { expected: usize, got: usize },
    #[error("not a valid permutation")]
    InvalidPermutation,
}

fn validate_permutation(new_order: &[usize], n: usize) -> Result<(), PermuteError> {
    if new_order.len() != n {
        return Err(PermuteError::LengthMismatch {
            expected: n,
            got: new_order.len(),
        });
    }
    let mut seen = vec![false; n];
    for &idx in new_order {
        if idx >= n || seen[idx] {
            return Err(PermuteError::InvalidPermutation);
        }
        seen[idx] = true;
    }
    Ok(())
}

/// Renumbers vertices so that `new_order[new] = old`. Edges keep their
/// labels and direction; topologies are relabelled with the vertices.
pub fn permute(graph: &Graph, new_order: &[usize]) -> Result<Graph, PermuteError> {
    let n = graph.order();
    validate_permutation(new_order, n)?;

    let mut permuted = Graph::with_capacity(n);
    for &old in new_order {
        permuted.add_atom(graph.atom(old).clone());
    }

    let mut old_to_new = vec![0usize; n];
    for (new, &old) in new_order.iter().enumerate() {
        old_to_new[old] = new;
    }

    for edge in graph.edges() {
        let (u, v) = edge.endpoints();
        permuted.add_edge(Edge::new(old_to_new[u], old_to_new[v], edge.bond()));
    }
    // edge ids carry over, so each neighbour list keeps its order
    for (new, &old) in new_order.iter().enumerate() {
        permuted.reorder_adjacency(new, graph.edge_ids_of(old));
    }
    for topology in graph.topologies() {
        permuted.add_topology(topology.remap(&old_to_new));
    }
    permuted.add_flags(graph.flags(Graph::HAS_STEREO | Graph::HAS_AROM));
    permuted.set_title(graph.title().map(str::to_owned));
    Ok(permuted)
}

/// A petgraph copy with matching node and edge indices. Edge weights keep
/// the label relative to the edge's source.
pub fn to_petgraph(graph: &Graph) -> UnGraph<Atom, Bond> {
    let mut out = UnGraph::with_capacity(graph.order(), graph.size());
    for atom in graph.atoms() {
        out.add_node(atom.clone());
    }
    for edge in graph.edges() {
        let (u, v) = edge.endpoints();
        out.add_edge(NodeIndex::new(u), NodeIndex::new(v), edge.bond());
    }
    out
}
