//! Local stereo arrangements.
//!
//! A [`Topology`] pins a [`Configuration`] to an ordered list of carrier
//! vertices around a focus. The focus itself may appear among the carriers,
//! standing in for an implicit hydrogen or lone pair.
//!
//! Every configuration places its carriers at fixed positions of an ideal
//! shape (tetrahedron, square, trigonal bipyramid, octahedron). Two
//! descriptions are the same arrangement exactly when a proper rotation of
//! the shape carries one placement onto the other, which is how a
//! configuration is re-expressed against a new carrier order.

use std::sync::OnceLock;

use thiserror::Error;

use crate::configuration::{Configuration, ConfigurationType};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Topology {
    focus: usize,
    carriers: Vec<usize>,
    configuration: Configuration,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TopologyError {
    #[error("{kind:?} configuration needs {expected} carriers, found {found}")]
    CarrierCount {
        kind: ConfigurationType,
        expected: usize,
        found: usize,
    },
    #[error("configuration '{0}' does not name a concrete geometry")]
    Unresolved(Configuration),
    #[error("carrier order is not a permutation of the stored carriers")]
    NotAPermutation,
}

impl Topology {
    /// `configuration` must be explicit; resolve `@`/`@@` with
    /// [`Configuration::resolve`] first.
    pub fn new(
        focus: usize,
        carriers: Vec<usize>,
        configuration: Configuration,
    ) -> Result<Topology, TopologyError> {
        let kind = configuration.config_type();
        if matches!(kind, ConfigurationType::None | ConfigurationType::Implicit) {
            return Err(TopologyError::Unresolved(configuration));
        }
        if carriers.len() != kind.carrier_count() {
            return Err(TopologyError::CarrierCount {
                kind,
                expected: kind.carrier_count(),
                found: carriers.len(),
            });
        }
        Ok(Topology {
            focus,
            carriers,
            configuration,
        })
    }

    pub fn focus(&self) -> usize {
        self.focus
    }

    pub fn carriers(&self) -> &[usize] {
        &self.carriers
    }

    pub fn configuration(&self) -> Configuration {
        self.configuration
    }

    pub fn config_type(&self) -> ConfigurationType {
        self.configuration.config_type()
    }

    /// The configuration describing this arrangement when the carriers are
    /// listed in `order`.
    pub fn configuration_for(&self, order: &[usize]) -> Result<Configuration, TopologyError> {
        if !is_permutation(&self.carriers, order) {
            return Err(TopologyError::NotAPermutation);
        }
        let kind = self.config_type();
        let placed = positions(self.configuration)
            .ok_or(TopologyError::Unresolved(self.configuration))?;
        let group = rotations(kind);
        for n in 1..=kind.count() {
            let Some(candidate) = Configuration::of(kind, n) else {
                break;
            };
            let Some(candidate_placed) = positions(candidate) else {
                continue;
            };
            let image: Vec<usize> = self
                .carriers
                .iter()
                .map(|c| {
                    let i = order.iter().position(|o| o == c).unwrap_or(0);
                    candidate_placed[i]
                })
                .collect();
            if group
                .iter()
                .any(|g| placed.iter().zip(&image).all(|(&p, &q)| g[p] == q))
            {
                return Ok(candidate);
            }
        }
        Err(TopologyError::Unresolved(self.configuration))
    }

    /// The same arrangement with carriers listed in `order`.
    pub fn reordered(&self, order: &[usize]) -> Result<Topology, TopologyError> {
        Ok(Topology {
            focus: self.focus,
            carriers: order.to_vec(),
            configuration: self.configuration_for(order)?,
        })
    }

    /// Whether `other` describes the same arrangement around the same focus.
    pub fn same_arrangement(&self, other: &Topology) -> bool {
        self.focus == other.focus
            && self.config_type() == other.config_type()
            && self.configuration_for(&other.carriers) == Ok(other.configuration)
    }

    /// Relabels every vertex through `old_to_new`.
    pub fn remap(&self, old_to_new: &[usize]) -> Topology {
        Topology {
            focus: old_to_new[self.focus],
            carriers: self.carriers.iter().map(|&c| old_to_new[c]).collect(),
            configuration: self.configuration,
        }
    }
}

fn is_permutation(a: &[usize], b: &[usize]) -> bool {
    let mut a = a.to_vec();
    let mut b = b.to_vec();
    a.sort_unstable();
    b.sort_unstable();
    a == b
}

// (first axial carrier, second axial carrier, clockwise), by TB number
const TRIGONAL: [(usize, usize, bool); 20] = [
    (0, 4, false),
    (0, 4, true),
    (0, 3, false),
    (0, 3, true),
    (0, 2, false),
    (0, 2, true),
    (0, 1, false),
    (0, 1, true),
    (1, 4, false),
    (1, 3, false),
    (1, 4, true),
    (1, 3, true),
    (1, 2, false),
    (1, 2, true),
    (2, 4, false),
    (2, 3, false),
    (3, 4, false),
    (3, 4, true),
    (2, 3, true),
    (2, 4, true),
];

#[derive(Debug, Clone, Copy)]
enum Equator {
    U,
    Z,
    Four,
}

impl Equator {
    // cyclic order of the four equatorial carriers, as indices into them
    fn cycle(self) -> [usize; 4] {
        match self {
            Equator::U => [0, 1, 2, 3],
            Equator::Z => [0, 1, 3, 2],
            Equator::Four => [0, 2, 1, 3],
        }
    }
}

// (axial partner of the first carrier, equator shape, clockwise), by OH number
const OCTAHEDRAL: [(usize, Equator, bool); 30] = [
    (5, Equator::U, false),
    (5, Equator::U, true),
    (4, Equator::U, false),
    (5, Equator::Z, false),
    (4, Equator::Z, false),
    (3, Equator::U, false),
    (3, Equator::Z, false),
    (5, Equator::Four, true),
    (4, Equator::Four, true),
    (5, Equator::Four, false),
    (4, Equator::Four, false),
    (3, Equator::Four, true),
    (3, Equator::Four, false),
    (5, Equator::Z, true),
    (4, Equator::Z, true),
    (4, Equator::U, true),
    (3, Equator::Z, true),
    (3, Equator::U, true),
    (2, Equator::U, false),
    (2, Equator::Z, false),
    (2, Equator::Four, true),
    (2, Equator::Four, false),
    (2, Equator::Z, true),
    (2, Equator::U, true),
    (1, Equator::U, false),
    (1, Equator::Z, false),
    (1, Equator::Four, true),
    (1, Equator::Four, false),
    (1, Equator::Z, true),
    (1, Equator::U, true),
];

/// Shape position of each listed carrier.
///
/// Tetrahedral and square positions run 0..4; square positions are in
/// cyclic order around the plane. Bipyramid positions 0 and 4 are the axis
/// with 1, 2, 3 anticlockwise around it seen from 0; octahedron positions 0
/// and 5 are the axis with 1..=4 anticlockwise seen from 0.
fn positions(config: Configuration) -> Option<Vec<usize>> {
    let n = config.number();
    match config.config_type() {
        ConfigurationType::Tetrahedral
        | ConfigurationType::ExtendedTetrahedral
        | ConfigurationType::DoubleBond => Some(if n == 1 {
            vec![0, 1, 2, 3]
        } else {
            vec![0, 1, 3, 2]
        }),
        ConfigurationType::SquarePlanar => Some(match n {
            1 => vec![0, 1, 2, 3],
            2 => vec![0, 2, 1, 3],
            _ => vec![0, 1, 3, 2],
        }),
        ConfigurationType::TrigonalBipyramidal => {
            let (x, y, clockwise) = TRIGONAL[n - 1];
            let slots: [usize; 3] = if clockwise { [1, 3, 2] } else { [1, 2, 3] };
            let mut pos = vec![0; 5];
            pos[x] = 0;
            pos[y] = 4;
            for (k, r) in (0..5).filter(|&i| i != x && i != y).enumerate() {
                pos[r] = slots[k];
            }
            Some(pos)
        }
        ConfigurationType::Octahedral => {
            let (y, equator, clockwise) = OCTAHEDRAL[n - 1];
            let slots: [usize; 4] = if clockwise { [1, 4, 3, 2] } else { [1, 2, 3, 4] };
            let rest: Vec<usize> = (1..6).filter(|&i| i != y).collect();
            let mut pos = vec![0; 6];
            pos[y] = 5;
            for (k, &r) in equator.cycle().iter().enumerate() {
                pos[rest[r]] = slots[k];
            }
            Some(pos)
        }
        ConfigurationType::None | ConfigurationType::Implicit => None,
    }
}

/// Proper rotations of a shape as position permutations, `g[p]` being the
/// image of position `p`.
fn rotations(kind: ConfigurationType) -> &'static [Vec<usize>] {
    static TETRAHEDRAL: OnceLock<Vec<Vec<usize>>> = OnceLock::new();
    static SQUARE: OnceLock<Vec<Vec<usize>>> = OnceLock::new();
    static BIPYRAMID: OnceLock<Vec<Vec<usize>>> = OnceLock::new();
    static OCTAHEDRON: OnceLock<Vec<Vec<usize>>> = OnceLock::new();
    match kind {
        ConfigurationType::Tetrahedral
        | ConfigurationType::ExtendedTetrahedral
        | ConfigurationType::DoubleBond => {
            TETRAHEDRAL.get_or_init(|| closure(&[&[1, 2, 0, 3], &[0, 2, 3, 1]]))
        }
        ConfigurationType::SquarePlanar => {
            SQUARE.get_or_init(|| closure(&[&[1, 2, 3, 0], &[0, 3, 2, 1]]))
        }
        ConfigurationType::TrigonalBipyramidal => {
            BIPYRAMID.get_or_init(|| closure(&[&[0, 2, 3, 1, 4], &[4, 1, 3, 2, 0]]))
        }
        ConfigurationType::Octahedral => {
            OCTAHEDRON.get_or_init(|| closure(&[&[0, 2, 3, 4, 1, 5], &[4, 1, 0, 3, 5, 2]]))
        }
        ConfigurationType::None | ConfigurationType::Implicit => &[],
    }
}

fn closure(generators: &[&[usize]]) -> Vec<Vec<usize>> {
    let n = generators[0].len();
    let mut group = vec![(0..n).collect::<Vec<usize>>()];
    let mut next = 0;
    while next < group.len() {
        let h = group[next].clone();
        next += 1;
        for g in generators {
            let composed: Vec<usize> = h.iter().map(|&p| g[p]).collect();
            if !group.contains(&composed) {
                group.push(composed);
            }
        }
    }
    group
}

#[cfg(test)]
mod tests {
    use super::*;

    fn permutations(items: &[usize]) -> Vec<Vec<usize>> {
        if items.len() <= 1 {
            return vec![items.to_vec()];
        }
        let mut out = Vec::new();
        for i in 0..items.len() {
            let mut rest = items.to_vec();
            let head = rest.remove(i);
            for mut tail in permutations(&rest) {
                tail.insert(0, head);
                out.push(tail);
            }
        }
        out
    }

    #[test]
    fn group_orders() {
        assert_eq!(rotations(ConfigurationType::Tetrahedral).len(), 12);
        assert_eq!(rotations(ConfigurationType::SquarePlanar).len(), 8);
        assert_eq!(rotations(ConfigurationType::TrigonalBipyramidal).len(), 6);
        assert_eq!(rotations(ConfigurationType::Octahedral).len(), 24);
    }

    #[test]
    fn tetrahedral_swap_inverts() {
        let t = Topology::new(0, vec![1, 2, 3, 4], Configuration::Th1).unwrap();
        assert_eq!(t.configuration_for(&[2, 1, 3, 4]), Ok(Configuration::Th2));
        assert_eq!(t.configuration_for(&[2, 3, 1, 4]), Ok(Configuration::Th1));
        assert_eq!(t.configuration_for(&[4, 3, 2, 1]), Ok(Configuration::Th1));
    }

    #[test]
    fn square_planar_shapes() {
        let t = Topology::new(0, vec![1, 2, 3, 4], Configuration::Sp1).unwrap();
        assert_eq!(t.configuration_for(&[2, 3, 4, 1]), Ok(Configuration::Sp1));
        assert_eq!(t.configuration_for(&[4, 3, 2, 1]), Ok(Configuration::Sp1));
        assert_eq!(t.configuration_for(&[1, 3, 2, 4]), Ok(Configuration::Sp2));
        assert_eq!(t.configuration_for(&[1, 2, 4, 3]), Ok(Configuration::Sp3));
    }

    #[test]
    fn viewing_bipyramid_from_other_pole_flips_direction() {
        let t = Topology::new(0, vec![1, 2, 3, 4, 5], Configuration::Tb1).unwrap();
        assert_eq!(t.configuration_for(&[5, 2, 3, 4, 1]), Ok(Configuration::Tb2));
    }

    #[test]
    fn viewing_octahedron_from_other_pole_flips_direction() {
        let t = Topology::new(0, vec![1, 2, 3, 4, 5, 6], Configuration::Oh1).unwrap();
        assert_eq!(t.configuration_for(&[6, 2, 3, 4, 5, 1]), Ok(Configuration::Oh2));
    }

    // Each shape splits the orderings of its carriers into one class per
    // configuration, each class the size of the rotation group.
    fn assert_classes(kind: ConfigurationType, count: usize) {
        let size = kind.carrier_count();
        let carriers: Vec<usize> = (1..=size).collect();
        let group = rotations(kind).len();
        for n in 1..=count {
            let config = Configuration::of(kind, n).unwrap();
            let t = Topology::new(0, carriers.clone(), config).unwrap();
            let mut seen = vec![0usize; count];
            for order in permutations(&carriers) {
                let c = t.configuration_for(&order).unwrap();
                seen[c.number() - 1] += 1;
                if size < 6 {
                    let back = t.reordered(&order).unwrap();
                    assert_eq!(back.configuration_for(&carriers), Ok(config));
                }
            }
            assert!(seen.iter().all(|&s| s == group), "{config:?}: {seen:?}");
        }
    }

    #[test]
    fn tetrahedral_classes() {
        assert_classes(ConfigurationType::Tetrahedral, 2);
    }

    #[test]
    fn square_planar_classes() {
        assert_classes(ConfigurationType::SquarePlanar, 3);
    }

    #[test]
    fn trigonal_bipyramidal_classes() {
        assert_classes(ConfigurationType::TrigonalBipyramidal, 20);
    }

    #[test]
    fn octahedral_classes() {
        assert_classes(ConfigurationType::Octahedral, 30);
    }

    #[test]
    fn rejects_wrong_carrier_count_and_implicit() {
        assert!(matches!(
            Topology::new(0, vec![1, 2, 3], Configuration::Th1),
            Err(TopologyError::CarrierCount { found: 3, .. })
        ));
        assert_eq!(
            Topology::new(0, vec![1, 2, 3, 4], Configuration::AntiClockwise),
            Err(TopologyError::Unresolved(Configuration::AntiClockwise))
        );
        let t = Topology::new(0, vec![1, 2, 3, 4], Configuration::Th1).unwrap();
        assert_eq!(t.configuration_for(&[1, 2, 3, 9]), Err(TopologyError::NotAPermutation));
    }

    #[test]
    fn remap_relabels_vertices() {
        let t = Topology::new(1, vec![0, 1, 2, 3], Configuration::Th2).unwrap();
        let r = t.remap(&[3, 2, 1, 0]);
        assert_eq!(r.focus(), 2);
        assert_eq!(r.carriers(), &[3, 2, 1, 0]);
        assert_eq!(r.configuration(), Configuration::Th2);
    }
}
