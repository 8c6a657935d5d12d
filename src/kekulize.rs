//! Kekulization assigns alternating single and double bonds to aromatic
//! systems.
//!
//! Aromatic atoms that still need a double bond form a subset of the graph;
//! a perfect matching of that subset over delocalisable edges picks the
//! double bonds. Atoms whose bonding is already settled by charge, explicit
//! hydrogens or an exocyclic double bond are left out of the subset.
//!
//! If no valid assignment exists (e.g., an odd-membered ring with the
//! wrong electron count), [`kekulise`] returns a [`KekulizeError`] and the
//! graph is left untouched.

use log::debug;
use thiserror::Error;

use crate::bond::Bond;
use crate::element::Element;
use crate::graph::{EdgeId, Graph};
use crate::graph_ops::{cyclic_edges, cyclic_vertices};
use crate::matching::{augment_once, dfs, greedy, maximise, Matching};
use crate::traits::{HasAtomicNum, HasFormalCharge};

/// Error returned when no valid Kekulé structure exists.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KekulizeError {
    /// An odd number of atoms need a double bond, so they cannot all pair up.
    #[error("cannot kekulise aromatic system: {0} atoms need a double bond, an odd count")]
    OddCardinality(usize),
    /// The given atoms could not be assigned a double bond.
    #[error("cannot kekulise aromatic system: unmatched atoms {0:?}")]
    Unmatched(Vec<usize>),
}

/// Replaces aromatic atoms and bonds with an explicit Kekulé form, in place.
///
/// Matched pairs get a double bond, every other bond between two aromatic
/// atoms becomes an explicit single, aromatic (`:`) bonds to non-aromatic
/// atoms become implicit, and the atoms lose their aromatic flag.
/// Non-aromatic bonds and stereochemistry are preserved unchanged.
pub fn kekulise(graph: &mut Graph) -> Result<(), KekulizeError> {
    if graph.flags(Graph::HAS_AROM) == 0 {
        return Ok(());
    }
    let aromatic: Vec<bool> = graph.atoms().iter().map(|a| a.aromatic()).collect();
    let subset: Vec<bool> = (0..graph.order())
        .map(|v| aromatic[v] && !predetermined(graph, v))
        .collect();
    let target = subset.iter().filter(|&&s| s).count();
    if target % 2 == 1 {
        return Err(KekulizeError::OddCardinality(target));
    }

    let matching = generate_kekule_form(graph, &subset, target)?;

    for id in 0..graph.size() {
        let id = EdgeId(id);
        let edge = *graph.edge(id);
        let (u, v) = edge.endpoints();
        let bond = if subset[u] && matching.other(u) == Some(v) {
            Bond::Double
        } else if aromatic[u] && aromatic[v] && edge.bond().is_delocalisable() {
            Bond::Single
        } else if edge.bond() == Bond::Aromatic {
            Bond::Implicit
        } else {
            continue;
        };
        graph.set_bond(id, bond);
    }
    for v in 0..graph.order() {
        if aromatic[v] {
            let atom = graph.atom(v).to_aliphatic();
            graph.set_atom(v, atom);
        }
    }
    graph.remove_flags(Graph::HAS_AROM);
    Ok(())
}

/// Matches every vertex of `subset`, escalating from the cheap heuristics to
/// Blossom only when they come up short.
fn generate_kekule_form(
    graph: &Graph,
    subset: &[bool],
    target: usize,
) -> Result<Matching, KekulizeError> {
    let mut matching = Matching::empty(graph.order());
    let mut n_matched = greedy(graph, &mut matching, subset);
    debug!("greedy matched {n_matched} of {target}");

    if n_matched + 2 < target {
        let mut alternative = Matching::empty(graph.order());
        let k = dfs(graph, &mut alternative, subset);
        debug!("dfs matched {k} of {target}");
        if k > n_matched {
            matching = alternative;
            n_matched = k;
        }
    }
    if n_matched + 2 == target {
        n_matched = augment_once(graph, &mut matching, n_matched, subset);
    }
    if n_matched < target {
        n_matched = maximise(graph, &mut matching, n_matched, subset);
        debug!("blossom matched {n_matched} of {target}");
    }
    if n_matched < target {
        let unmatched = (0..graph.order())
            .filter(|&v| subset[v] && matching.unmatched(v))
            .collect();
        return Err(KekulizeError::Unmatched(unmatched));
    }
    Ok(matching)
}

/// Whether aromatic atom `v` already has its bonding settled and must not
/// receive a double bond.
fn predetermined(graph: &Graph, v: usize) -> bool {
    let atom = graph.atom(v);
    let element = Element::from_atomic_num(atom.atomic_num()).unwrap_or_default();
    let q = atom.formal_charge();
    let deg = graph.degree(v) + graph.implicit_h_count(v) as usize;

    if graph.bonded_valence(v) as usize > graph.degree(v) {
        for e in graph.edges_of(v) {
            match e.bond() {
                Bond::Double => {
                    let oxide = q == 0
                        && (element == Element::N || (element == Element::S && deg > 3))
                        && graph.atom(e.other(v)).element() == Element::O;
                    return !oxide;
                }
                Bond::Triple | Bond::Quadruple => return true,
                _ => {}
            }
        }
    }

    match element {
        Element::B => q == 0 && deg == 3,
        Element::C => (q == 1 || q == -1) && deg == 3,
        Element::Si | Element::Ge => q < 0,
        Element::N | Element::P | Element::As | Element::Sb => match q {
            0 => deg == 3 || deg > 4,
            1 => deg > 3,
            _ => true,
        },
        Element::O | Element::S | Element::Se | Element::Te => match q {
            0 => deg == 2 || deg == 4 || deg > 5,
            -1 | 1 => deg == 3 || deg == 5 || deg > 6,
            _ => false,
        },
        _ => false,
    }
}

/// Moves ring double bonds to a canonical position, so that different
/// Kekulé forms of the same ring system end up identical.
///
/// Only double bonds inside rings between atoms with exactly one double
/// bond each are moved. Rings next to `/` or `\` bonds are left alone, as
/// shifting their double bonds would change what the directional bonds mean.
pub fn resonate(graph: &mut Graph) -> Result<(), KekulizeError> {
    let ring_edges = cyclic_edges(graph);
    let ring_atoms = cyclic_vertices(graph);
    let n = graph.order();

    let movable: Vec<bool> = (0..n)
        .map(|v| {
            ring_atoms[v]
                && graph.bonded_valence(v) as usize == graph.degree(v) + 1
                && !graph.edges_of(v).any(|e| e.bond().is_directional())
                && graph
                    .edge_ids_of(v)
                    .iter()
                    .filter(|id| graph.edge(**id).bond() == Bond::Double && ring_edges[id.0])
                    .count()
                    == 1
        })
        .collect();

    let mut subset = vec![false; n];
    let mut targets = Vec::new();
    for (i, edge) in graph.edges().iter().enumerate() {
        let (u, v) = edge.endpoints();
        if edge.bond() == Bond::Double && ring_edges[i] && movable[u] && movable[v] {
            subset[u] = true;
            subset[v] = true;
            targets.push(EdgeId(i));
        }
    }
    if targets.is_empty() {
        return Ok(());
    }

    let before: Vec<_> = targets.iter().map(|&id| (id, graph.edge(id).bond())).collect();
    for &id in &targets {
        graph.set_bond(id, Bond::Implicit);
    }
    let target = subset.iter().filter(|&&s| s).count();
    let matching = match generate_kekule_form(graph, &subset, target) {
        Ok(m) => m,
        Err(e) => {
            for (id, bond) in before {
                graph.set_bond(id, bond);
            }
            return Err(e);
        }
    };
    for (u, v) in matching.pairs() {
        if let Some(id) = graph.edge_between(u, v) {
            graph.set_bond(id, Bond::Double);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::smiles::{parse_smiles, parse_smiles_with, to_smiles, ParseOptions};

    fn delocalised(smiles: &str) -> Graph {
        let options = ParseOptions {
            kekulise: false,
            ..ParseOptions::default()
        };
        parse_smiles_with(smiles, &options).unwrap().graph
    }

    fn kekule(smiles: &str) -> Graph {
        let mut g = delocalised(smiles);
        kekulise(&mut g).unwrap();
        g
    }

    fn count_double_bonds(g: &Graph) -> usize {
        g.edges().iter().filter(|e| e.bond() == Bond::Double).count()
    }

    fn is_valid_kekulization(g: &Graph) -> bool {
        (0..g.order()).all(|v| {
            !g.atom(v).aromatic()
                && g.edges_of(v).filter(|e| e.bond() == Bond::Double).count() <= 1
                && g.edges_of(v).all(|e| e.bond() != Bond::Aromatic)
        })
    }

    #[test]
    fn benzene() {
        let g = kekule("c1ccccc1");
        assert_eq!(g.order(), 6);
        assert_eq!(g.size(), 6);
        assert_eq!(count_double_bonds(&g), 3);
        assert!(is_valid_kekulization(&g));
        for v in 0..6 {
            assert_eq!(g.implicit_h_count(v), 1);
        }
        assert_eq!(g.flags(Graph::HAS_AROM), 0);
    }

    #[test]
    fn naphthalene() {
        let g = kekule("c1ccc2ccccc2c1");
        assert_eq!(g.order(), 10);
        assert_eq!(g.size(), 11);
        assert_eq!(count_double_bonds(&g), 5);
        assert!(is_valid_kekulization(&g));
    }

    #[test]
    fn pyridine() {
        let g = kekule("c1ccncc1");
        assert_eq!(count_double_bonds(&g), 3);
        assert!(is_valid_kekulization(&g));
        assert_eq!(g.atom(3).element(), Element::N);
        assert_eq!(g.implicit_h_count(3), 0);
    }

    #[test]
    fn pyrrole() {
        let g = kekule("[nH]1cccc1");
        assert_eq!(g.order(), 5);
        assert_eq!(count_double_bonds(&g), 2);
        assert!(is_valid_kekulization(&g));
        assert_eq!(g.implicit_h_count(0), 1);
    }

    #[test]
    fn furan() {
        let g = kekule("o1cccc1");
        assert_eq!(count_double_bonds(&g), 2);
        assert!(is_valid_kekulization(&g));
        assert_eq!(g.implicit_h_count(0), 0);
    }

    #[test]
    fn thiophene() {
        let g = kekule("s1cccc1");
        assert_eq!(count_double_bonds(&g), 2);
        assert!(is_valid_kekulization(&g));
        assert_eq!(g.implicit_h_count(0), 0);
    }

    #[test]
    fn cyclopentadienyl_anion() {
        let g = kekule("[cH-]1cccc1");
        assert_eq!(g.order(), 5);
        assert_eq!(count_double_bonds(&g), 2);
        assert!(is_valid_kekulization(&g));
    }

    #[test]
    fn cyclopentadienyl_anion_bare_fails() {
        let mut g = delocalised("[c-]1cccc1");
        assert_eq!(kekulise(&mut g), Err(KekulizeError::OddCardinality(5)));
    }

    #[test]
    fn cyclopentadienyl_no_charge_fails() {
        let mut g = delocalised("c1cccc1");
        let before = g.clone();
        assert!(kekulise(&mut g).is_err());
        assert_eq!(g, before);
    }

    #[test]
    fn odd_subset_in_four_ring_fails() {
        let mut g = delocalised("c1c[nH]c1");
        assert_eq!(kekulise(&mut g), Err(KekulizeError::OddCardinality(3)));
    }

    #[test]
    fn cyclobutadiene_kekulizes() {
        let g = kekule("c1ccc1");
        assert_eq!(count_double_bonds(&g), 2);
    }

    #[test]
    fn phenol() {
        let g = kekule("Oc1ccccc1");
        let o_c = g.edge_between(0, 1).unwrap();
        assert_eq!(g.edge(o_c).bond(), Bond::Implicit);
        assert_eq!(g.implicit_h_count(0), 1);
        assert_eq!(count_double_bonds(&g), 3);
        assert!(is_valid_kekulization(&g));
    }

    #[test]
    fn toluene() {
        let g = kekule("Cc1ccccc1");
        assert_eq!(g.order(), 7);
        assert_eq!(g.size(), 7);
        assert_eq!(count_double_bonds(&g), 3);
        assert!(is_valid_kekulization(&g));
    }

    #[test]
    fn h_counts_preserved() {
        for smiles in ["c1ccccc1", "c1ccncc1", "Oc1ccccc1", "c1cc[nH]c1", "O=c1cc[nH]cc1"] {
            let g = delocalised(smiles);
            let expected: Vec<u8> = (0..g.order()).map(|v| g.implicit_h_count(v)).collect();
            let k = g.kekule().unwrap();
            let actual: Vec<u8> = (0..k.order()).map(|v| k.implicit_h_count(v)).collect();
            assert_eq!(expected, actual, "{smiles}");
        }
    }

    #[test]
    fn non_aromatic_passthrough() {
        let mut g = delocalised("C=CC");
        let before = g.clone();
        kekulise(&mut g).unwrap();
        assert_eq!(g, before);
    }

    #[test]
    fn directional_bonds_preserved() {
        let g = kekule("F/C=C/c1ccccc1");
        assert_eq!(g.edge_at(0, 0).bond(), Bond::Up);
        assert_eq!(g.edge(g.edge_between(1, 2).unwrap()).bond(), Bond::Double);
        assert_ne!(g.flags(Graph::HAS_BOND_STEREO), 0);
    }

    #[test]
    fn error_display() {
        let err = KekulizeError::Unmatched(vec![0, 2]);
        let msg = format!("{}", err);
        assert!(msg.contains("[0, 2]"));
    }

    #[test]
    fn imidazole() {
        let g = kekule("c1c[nH]cn1");
        assert_eq!(count_double_bonds(&g), 2);
        assert!(is_valid_kekulization(&g));
    }

    #[test]
    fn anthracene() {
        let g = kekule("c1ccc2cc3ccccc3cc2c1");
        assert_eq!(g.order(), 14);
        assert_eq!(count_double_bonds(&g), 7);
        assert!(is_valid_kekulization(&g));
    }

    #[test]
    fn parse_kekulises_by_default() {
        let g = parse_smiles("c1ccccc1").unwrap();
        assert_eq!(count_double_bonds(&g), 3);
        assert!(is_valid_kekulization(&g));
    }

    #[test]
    fn bare_pyridinium() {
        let g = kekule("[n+]1ccccc1");
        assert_eq!(count_double_bonds(&g), 3);
        assert!(is_valid_kekulization(&g));
    }

    #[test]
    fn methylpyridinium() {
        let g = kekule("C[n+]1ccccc1");
        assert_eq!(g.order(), 7);
        assert_eq!(count_double_bonds(&g), 3);
    }

    #[test]
    fn pyridinium_ion() {
        let g = kekule("c1cc[nH+]cc1");
        assert_eq!(count_double_bonds(&g), 3);
    }

    #[test]
    fn imidazolium() {
        let g = kekule("C[n+]1cc[nH]c1");
        assert_eq!(count_double_bonds(&g), 2);
        assert!(is_valid_kekulization(&g));
    }

    #[test]
    fn benzothiazolium() {
        let g = kekule("Cc1sc2ccccc2[n+]1C");
        assert_eq!(g.order(), 11);
        assert_eq!(count_double_bonds(&g), 4);
        assert!(is_valid_kekulization(&g));
    }

    #[test]
    fn quinolinium() {
        let g = kekule("c1ccc2[nH+]cccc2c1");
        assert_eq!(count_double_bonds(&g), 5);
        assert!(is_valid_kekulization(&g));
    }

    #[test]
    fn caffeine() {
        let g = kekule("Cn1cnc2c1c(=O)n(C)c(=O)n2C");
        // two carbonyls plus one double bond in each ring
        assert_eq!(count_double_bonds(&g), 4);
        assert!(is_valid_kekulization(&g));
    }

    #[test]
    fn pyridine_n_oxide() {
        let g = kekule("O=n1ccccc1");
        assert_eq!(count_double_bonds(&g), 4);
    }

    #[test]
    fn aromatic_bond_to_aliphatic_atom_made_implicit() {
        let g = kekule("C:c1ccccc1");
        assert_eq!(g.edge_at(0, 0).bond(), Bond::Implicit);
        assert_eq!(count_double_bonds(&g), 3);
    }

    #[test]
    fn resonate_canonicalises_ring_double_bonds() {
        let mut a = parse_smiles("C1=CC=CC=C1").unwrap();
        let mut b = parse_smiles("C1C=CC=CC=1").unwrap();
        resonate(&mut a).unwrap();
        resonate(&mut b).unwrap();
        assert_eq!(to_smiles(&a).unwrap(), to_smiles(&b).unwrap());
    }

    #[test]
    fn resonate_leaves_exocyclic_and_directional_bonds() {
        let mut g = parse_smiles("C=C1CCCC1").unwrap();
        let before = g.clone();
        resonate(&mut g).unwrap();
        assert_eq!(g, before);

        let mut g = parse_smiles("F/C=C/C1=CC=CC=C1").unwrap();
        resonate(&mut g).unwrap();
        assert_eq!(g.edge(g.edge_between(1, 2).unwrap()).bond(), Bond::Double);
    }
}
