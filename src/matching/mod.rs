//! Matchings restricted to a vertex subset of a [`Graph`].
//!
//! Only edges whose label is still delocalisable (implicit or aromatic)
//! may be matched, and both endpoints must belong to the subset. The
//! heuristics are cheap and usually sufficient; [`maximise`] finds a
//! maximum matching when they are not.

mod blossom;

use log::{debug, trace};

use crate::graph::Graph;

pub use blossom::maximise;

/// A vertex → partner map.
///
/// Pairing `u` with `v` overwrites both entries without touching the
/// previous partners, so a stale entry may remain on the other side. A
/// vertex counts as matched only when its partner points back at it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Matching {
    partner: Vec<Option<usize>>,
}

impl Matching {
    pub fn empty(n: usize) -> Matching {
        Matching {
            partner: vec![None; n],
        }
    }

    pub fn pair(&mut self, u: usize, v: usize) {
        self.partner[u] = Some(v);
        self.partner[v] = Some(u);
    }

    /// The partner of `v`, if the pairing is mutual.
    pub fn other(&self, v: usize) -> Option<usize> {
        self.partner[v].filter(|&w| self.partner[w] == Some(v))
    }

    pub fn matched(&self, v: usize) -> bool {
        self.other(v).is_some()
    }

    pub fn unmatched(&self, v: usize) -> bool {
        !self.matched(v)
    }

    /// Matched pairs `(u, v)` with `u < v`.
    pub fn pairs(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (0..self.partner.len()).filter_map(move |u| match self.other(u) {
            Some(v) if u < v => Some((u, v)),
            _ => None,
        })
    }

    pub fn len(&self) -> usize {
        self.pairs().count()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs().next().is_none()
    }
}

fn eligible<'a>(
    graph: &'a Graph,
    subset: &'a [bool],
    v: usize,
) -> impl Iterator<Item = usize> + 'a {
    graph
        .edges_of(v)
        .filter(|e| e.bond().is_delocalisable())
        .map(move |e| e.other(v))
        .filter(move |&w| subset[w])
}

/// Pairs each unmatched subset vertex with its first unmatched eligible
/// neighbour, in vertex order. Returns the number of matched vertices.
pub fn greedy(graph: &Graph, matching: &mut Matching, subset: &[bool]) -> usize {
    let mut n_matched = 0;
    for v in 0..graph.order() {
        if !subset[v] || matching.matched(v) {
            continue;
        }
        let mate = eligible(graph, subset, v).find(|&w| matching.unmatched(w));
        if let Some(w) = mate {
            matching.pair(v, w);
            n_matched += 2;
        }
    }
    n_matched
}

/// Depth-first alternating heuristic. Starts from vertices with a single
/// possible partner, matches them, and walks outward leaving every other
/// edge unmatched; then does the same from whatever is left. Paths and
/// trees are always matched maximally this way.
pub fn dfs(graph: &Graph, matching: &mut Matching, subset: &[bool]) -> usize {
    let n = graph.order();
    let mut visited: Vec<bool> = subset.iter().map(|&s| !s).collect();
    let mut n_matched = 0;

    for v in 0..n {
        if visited[v] || matching.matched(v) {
            continue;
        }
        let candidates = eligible(graph, subset, v).filter(|&w| !visited[w]).count();
        if candidates == 1 {
            n_matched += visit(graph, matching, subset, &mut visited, v);
        }
    }
    for v in 0..n {
        if !visited[v] && matching.unmatched(v) {
            n_matched += visit(graph, matching, subset, &mut visited, v);
        }
    }
    n_matched
}

fn visit(
    graph: &Graph,
    matching: &mut Matching,
    subset: &[bool],
    visited: &mut [bool],
    start: usize,
) -> usize {
    let mut n_matched = 0;
    visited[start] = true;
    let mut stack = vec![start];
    while let Some(v) = stack.pop() {
        if matching.unmatched(v) {
            // must take a partner if one is left
            if let Some(w) = eligible(graph, subset, v).find(|&w| !visited[w]) {
                visited[w] = true;
                matching.pair(v, w);
                n_matched += 2;
                stack.push(w);
            }
        } else {
            // matched: neighbours may still pair onward
            for w in eligible(graph, subset, v) {
                if !visited[w] {
                    visited[w] = true;
                    stack.push(w);
                }
            }
        }
    }
    n_matched
}

/// Looks for a single augmenting path when exactly two subset vertices are
/// unmatched, and flips it. Returns the updated number of matched vertices.
pub fn augment_once(
    graph: &Graph,
    matching: &mut Matching,
    n_matched: usize,
    subset: &[bool],
) -> usize {
    let free: Vec<usize> = (0..graph.order())
        .filter(|&v| subset[v] && matching.unmatched(v))
        .collect();
    let [start, goal] = free[..] else {
        return n_matched;
    };

    let n = graph.order();
    let mut prev: Vec<Option<usize>> = vec![None; n];
    let mut visited = vec![false; n];
    visited[start] = true;
    // Every vertex on the stack sits an even number of edges from `start`,
    // so reaching `goal` from one gives a path with an odd number of edges.
    let mut stack = vec![start];
    while let Some(u) = stack.pop() {
        for w in eligible(graph, subset, u) {
            if visited[w] || matching.other(u) == Some(w) {
                continue;
            }
            if w == goal {
                prev[w] = Some(u);
                flip(matching, &prev, start, goal);
                trace!("augmented between {start} and {goal}");
                return n_matched + 2;
            }
            let Some(x) = matching.other(w) else {
                continue;
            };
            if visited[x] {
                continue;
            }
            visited[w] = true;
            visited[x] = true;
            prev[w] = Some(u);
            prev[x] = Some(w);
            stack.push(x);
        }
    }
    n_matched
}

fn flip(matching: &mut Matching, prev: &[Option<usize>], start: usize, goal: usize) {
    let mut v = goal;
    while let Some(u) = prev[v] {
        matching.pair(u, v);
        if u == start {
            break;
        }
        match prev[u] {
            Some(next) => v = next,
            None => break,
        }
    }
}

/// A maximum matching of `subset`: greedy, then a single augmentation if
/// that leaves exactly two vertices free, then Blossom.
///
/// # Panics
///
/// If `subset` does not have one entry per vertex of `graph`.
pub fn maximum_matching(graph: &Graph, subset: &[bool]) -> Matching {
    assert_eq!(
        subset.len(),
        graph.order(),
        "subset must have one entry per vertex"
    );
    let target = subset.iter().filter(|&&s| s).count();
    let mut matching = Matching::empty(graph.order());
    let mut n_matched = greedy(graph, &mut matching, subset);
    debug!("greedy matched {n_matched} of {target}");
    if n_matched + 2 == target {
        n_matched = augment_once(graph, &mut matching, n_matched, subset);
    }
    if n_matched < target {
        n_matched = maximise(graph, &mut matching, n_matched, subset);
        debug!("blossom matched {n_matched} of {target}");
    }
    matching
}
