//! Edmonds' maximum matching.
//!
//! Each round grows an alternating forest from every free subset vertex.
//! Odd cycles are contracted into blossoms through a union-find whose
//! representative stands for the whole blossom, and the round ends as soon
//! as an edge joins two different trees. The path through that edge is
//! expanded back out of any blossoms and flipped.

use std::collections::{HashMap, VecDeque};

use log::trace;
use petgraph::unionfind::UnionFind;

use super::{eligible, Matching};
use crate::graph::Graph;

/// Augments `matching` until no augmenting path remains. Returns the
/// number of matched vertices.
pub fn maximise(
    graph: &Graph,
    matching: &mut Matching,
    n_matched: usize,
    subset: &[bool],
) -> usize {
    let mut blossom = Blossom::new(graph, matching, subset);
    let mut n_matched = n_matched;
    while blossom.augment() {
        n_matched += 2;
    }
    n_matched
}

struct Blossom<'a> {
    graph: &'a Graph,
    matching: &'a mut Matching,
    subset: &'a [bool],
    /// For an even vertex, the odd vertex it is matched to (itself for a root).
    even: Vec<Option<usize>>,
    /// For an odd vertex, the even vertex it was reached from.
    odd: Vec<Option<usize>>,
    queue: VecDeque<usize>,
    uf: UnionFind<usize>,
    /// Whether `uf` holds a contraction from an earlier round.
    contracted: bool,
    /// Odd vertices absorbed into a blossom, keyed to the edge that closed it.
    bridges: HashMap<usize, (usize, usize)>,
    v_ancestors: Vec<bool>,
    w_ancestors: Vec<bool>,
}

impl<'a> Blossom<'a> {
    fn new(graph: &'a Graph, matching: &'a mut Matching, subset: &'a [bool]) -> Blossom<'a> {
        let n = graph.order();
        Blossom {
            graph,
            matching,
            subset,
            even: vec![None; n],
            odd: vec![None; n],
            queue: VecDeque::new(),
            uf: UnionFind::new(n),
            contracted: false,
            bridges: HashMap::new(),
            v_ancestors: vec![false; n],
            w_ancestors: vec![false; n],
        }
    }

    /// One search round. Returns whether an augmenting path was flipped.
    fn augment(&mut self) -> bool {
        let n = self.graph.order();
        self.even.fill(None);
        self.odd.fill(None);
        // petgraph's UnionFind cannot be reset in place; without a
        // contraction it is still the identity and is kept
        if self.contracted {
            self.uf = UnionFind::new(n);
            self.contracted = false;
        }
        self.bridges.clear();
        self.queue.clear();

        for v in 0..n {
            if self.subset[v] && self.matching.unmatched(v) {
                self.even[v] = Some(v);
                self.queue.push_back(v);
            }
        }

        let graph = self.graph;
        let subset = self.subset;
        while let Some(v) = self.queue.pop_front() {
            for w in eligible(graph, subset, v) {
                if self.even[self.uf.find_mut(w)].is_some() {
                    if self.check(v, w) {
                        return true;
                    }
                } else if self.odd[w].is_none() {
                    self.odd[w] = Some(v);
                    let Some(u) = self.matching.other(w) else {
                        continue;
                    };
                    if self.even[self.uf.find_mut(u)].is_none() {
                        self.even[u] = Some(w);
                        self.queue.push_back(u);
                    }
                }
            }
        }
        false
    }

    /// `v` and `w` are both even. Walks up both trees in lock step: a
    /// shared ancestor means a blossom, two roots mean an augmenting path.
    fn check(&mut self, v: usize, w: usize) -> bool {
        if self.uf.equiv(v, w) {
            return false;
        }
        self.v_ancestors.fill(false);
        self.w_ancestors.fill(false);
        let mut v_curr = v;
        let mut w_curr = w;
        loop {
            v_curr = self.parent(true, v_curr);
            w_curr = self.parent(false, w_curr);

            if v_curr == w_curr {
                self.blossom(v, w, v_curr);
                return false;
            }

            if self.is_root(v_curr) && self.is_root(w_curr) {
                self.flip_path(v);
                self.flip_path(w);
                self.matching.pair(v, w);
                trace!("augmenting path through ({v}, {w})");
                return true;
            }

            if self.w_ancestors[v_curr] {
                self.blossom(v, w, v_curr);
                return false;
            }
            if self.v_ancestors[w_curr] {
                self.blossom(v, w, w_curr);
                return false;
            }
        }
    }

    fn is_root(&mut self, curr: usize) -> bool {
        match self.even[curr] {
            Some(e) => self.uf.find_mut(e) == curr,
            None => false,
        }
    }

    /// The next even blossom up the tree from `curr`, recording the blossoms
    /// passed on the side's ancestor list.
    fn parent(&mut self, v_side: bool, curr: usize) -> usize {
        let curr = self.uf.find_mut(curr);
        self.ancestors(v_side)[curr] = true;
        let Some(e) = self.even[curr] else {
            return curr;
        };
        let parent = self.uf.find_mut(e);
        if parent == curr {
            return curr;
        }
        self.ancestors(v_side)[parent] = true;
        match self.odd[parent] {
            Some(o) => self.uf.find_mut(o),
            None => curr,
        }
    }

    fn ancestors(&mut self, v_side: bool) -> &mut Vec<bool> {
        if v_side {
            &mut self.v_ancestors
        } else {
            &mut self.w_ancestors
        }
    }

    /// Contracts the cycle closed by `(v, w)` into a blossom with `base`.
    fn blossom(&mut self, v: usize, w: usize, base: usize) {
        let base = self.uf.find_mut(base);
        let v_side = self.supports(v, w, base);
        let w_side = self.supports(w, v, base);
        for side in [v_side, w_side] {
            for &s in &side {
                self.uf.union(s, side[0]);
            }
        }
        self.contracted = true;
        let rep = self.uf.find_mut(base);
        self.even[rep] = self.even[base];
    }

    /// Blossoms from `v` up to `base`. Odd vertices on the way become even:
    /// they are queued and remember the bridge `(v, w)`.
    fn supports(&mut self, v: usize, w: usize, base: usize) -> Vec<usize> {
        let mut path = vec![self.uf.find_mut(v)];
        while let Some(&last) = path.last() {
            if last == base {
                break;
            }
            let Some(u) = self.even[last] else {
                break;
            };
            path.push(u);
            self.bridges.insert(u, (v, w));
            self.queue.push_back(u);
            let Some(o) = self.odd[u] else {
                break;
            };
            path.push(self.uf.find_mut(o));
        }
        path
    }

    /// Flips the alternating path from even vertex `v` back to its root.
    fn flip_path(&mut self, v: usize) {
        let mut path = Vec::new();
        self.build_path(&mut path, v, None);
        for pair in path[1..].chunks_exact(2) {
            self.matching.pair(pair[0], pair[1]);
        }
    }

    /// Appends the alternating path from `start` up to `goal` (or the root),
    /// expanding blossoms through their bridges.
    fn build_path(&self, path: &mut Vec<usize>, start: usize, goal: Option<usize>) {
        let mut start = start;
        loop {
            while self.odd[start].is_some() {
                let Some(&(first, second)) = self.bridges.get(&start) else {
                    break;
                };
                let from = path.len();
                self.build_path(path, first, Some(start));
                path[from..].reverse();
                start = second;
            }
            path.push(start);
            let Some(mate) = self.matching.other(start) else {
                return;
            };
            path.push(mate);
            if Some(mate) == goal {
                return;
            }
            match self.odd[mate] {
                Some(next) => start = next,
                None => return,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::graph_of;
    use super::super::{greedy, Matching};
    use super::*;

    fn maximum(n: usize, edges: &[(usize, usize)]) -> usize {
        let g = graph_of(n, edges);
        let subset = vec![true; n];
        let mut m = Matching::empty(n);
        let k = greedy(&g, &mut m, &subset);
        let k = maximise(&g, &mut m, k, &subset);
        assert_eq!(k, 2 * m.len());
        for (u, v) in m.pairs() {
            assert!(g.edge_between(u, v).is_some());
        }
        k
    }

    #[test]
    fn odd_cycle_with_tail() {
        // triangle 1-2-3 with stems
        assert_eq!(maximum(5, &[(1, 2), (2, 3), (3, 1), (0, 1), (3, 4)]), 4);
        assert_eq!(maximum(6, &[(1, 2), (2, 3), (3, 1), (0, 1), (3, 4), (2, 5)]), 6);
    }

    #[test]
    fn petersen_graph_is_perfect() {
        let edges = [
            (0, 1),
            (1, 2),
            (2, 3),
            (3, 4),
            (4, 0),
            (0, 5),
            (1, 6),
            (2, 7),
            (3, 8),
            (4, 9),
            (5, 7),
            (7, 9),
            (9, 6),
            (6, 8),
            (8, 5),
        ];
        assert_eq!(maximum(10, &edges), 10);
    }

    #[test]
    fn seeded_matching_is_repaired_through_blossom() {
        // pentagon 1-2-3-4-5 with stems 0-1 and 4-6
        let edges = [
            (1, 2),
            (3, 4),
            (5, 1),
            (2, 3),
            (4, 5),
            (0, 1),
            (4, 6),
        ];
        let g = graph_of(7, &edges);
        let subset = vec![true; 7];
        let mut m = Matching::empty(7);
        m.pair(1, 5);
        m.pair(2, 3);
        // free: 0, 4, 6; 0's only neighbour sits in the odd cycle
        assert_eq!(maximise(&g, &mut m, 4, &subset), 6);
        assert!(m.matched(0) || m.matched(6));
        assert_eq!(m.len(), 3);
    }

    #[test]
    fn blossoms_in_successive_rounds() {
        // two copies of the seeded pentagon, each needing its own round
        let pentagon = [(1, 2), (3, 4), (5, 1), (2, 3), (4, 5), (0, 1), (4, 6)];
        let edges: Vec<(usize, usize)> = pentagon
            .iter()
            .chain(pentagon.iter())
            .enumerate()
            .map(|(i, &(u, v))| if i < pentagon.len() { (u, v) } else { (u + 7, v + 7) })
            .collect();
        let g = graph_of(14, &edges);
        let subset = vec![true; 14];
        let mut m = Matching::empty(14);
        for offset in [0, 7] {
            m.pair(1 + offset, 5 + offset);
            m.pair(2 + offset, 3 + offset);
        }
        assert_eq!(maximise(&g, &mut m, 8, &subset), 12);
        assert_eq!(m.len(), 6);
        for (u, v) in m.pairs() {
            assert!(g.edge_between(u, v).is_some());
        }
    }

    #[test]
    fn star_matches_one_pair() {
        assert_eq!(maximum(4, &[(0, 1), (0, 2), (0, 3)]), 2);
    }
}
