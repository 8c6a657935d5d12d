use kekule::{maximum_matching, Atom, Bond, Edge, Element, Graph};

/// Small linear congruential generator so the cases are reproducible.
struct Lcg(u64);

impl Lcg {
    fn next(&mut self) -> u64 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.0 >> 33
    }

    fn below(&mut self, n: u64) -> u64 {
        self.next() % n
    }
}

fn random_graph(rng: &mut Lcg, n: usize, density: u64) -> (Graph, Vec<(usize, usize)>) {
    let mut g = Graph::new();
    for _ in 0..n {
        g.add_atom(Atom::Aliphatic(Element::C));
    }
    let mut edges = Vec::new();
    for u in 0..n {
        for v in u + 1..n {
            if rng.below(100) < density {
                g.add_edge(Edge::new(u, v, Bond::Implicit));
                edges.push((u, v));
            }
        }
    }
    (g, edges)
}

fn brute_force(edges: &[(usize, usize)], used: &mut Vec<bool>, from: usize) -> usize {
    let mut best = 0;
    for (i, &(u, v)) in edges.iter().enumerate().skip(from) {
        if used[u] || used[v] {
            continue;
        }
        used[u] = true;
        used[v] = true;
        best = best.max(1 + brute_force(edges, used, i + 1));
        used[u] = false;
        used[v] = false;
    }
    best
}

#[test]
fn blossom_agrees_with_brute_force() {
    let mut rng = Lcg(0x5eed);
    for case in 0..300 {
        let n = 2 + rng.below(9) as usize;
        let density = 15 + rng.below(50);
        let (g, edges) = random_graph(&mut rng, n, density);
        let subset = vec![true; n];

        let m = maximum_matching(&g, &subset);
        let expected = brute_force(&edges, &mut vec![false; n], 0);
        assert_eq!(
            m.len(),
            expected,
            "case {case}: n={n} edges={edges:?} got {:?}",
            m.pairs().collect::<Vec<_>>()
        );
        for (u, v) in m.pairs() {
            assert!(g.edge_between(u, v).is_some(), "case {case}: {u}-{v} is not an edge");
        }
    }
}

#[test]
fn subset_restricts_matching() {
    let mut rng = Lcg(42);
    for case in 0..200 {
        let n = 2 + rng.below(9) as usize;
        let (g, edges) = random_graph(&mut rng, n, 40);
        let subset: Vec<bool> = (0..n).map(|_| rng.below(3) != 0).collect();

        let m = maximum_matching(&g, &subset);
        let allowed: Vec<(usize, usize)> = edges
            .iter()
            .copied()
            .filter(|&(u, v)| subset[u] && subset[v])
            .collect();
        let expected = brute_force(&allowed, &mut vec![false; n], 0);
        assert_eq!(m.len(), expected, "case {case}: subset={subset:?} edges={edges:?}");
        for (u, v) in m.pairs() {
            assert!(subset[u] && subset[v], "case {case}: {u}-{v} leaves the subset");
        }
    }
}

#[test]
fn odd_cycles_need_blossoms() {
    // two triangles joined by a path; greedy alone can strand a vertex
    let mut g = Graph::new();
    for _ in 0..8 {
        g.add_atom(Atom::Aliphatic(Element::C));
    }
    for (u, v) in [(0, 1), (1, 2), (2, 0), (2, 3), (3, 4), (4, 5), (5, 6), (6, 7), (7, 5)] {
        g.add_edge(Edge::new(u, v, Bond::Implicit));
    }
    let m = maximum_matching(&g, &[true; 8]);
    assert_eq!(m.len(), 4);
}
