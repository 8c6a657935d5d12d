/// Bond label on a graph edge.
///
/// `Up` and `Down` are directional: the label is read relative to the
/// edge's first endpoint, and the second endpoint sees the inverse (see
/// [`Edge::bond_from`](crate::graph::Edge::bond_from)). Every other label is
/// symmetric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Bond {
    /// Disconnection (`.`). Never stored on an edge.
    Dot,
    /// No symbol written; single, or aromatic between two aromatic atoms.
    #[default]
    Implicit,
    Single,
    Double,
    Triple,
    Quadruple,
    Aromatic,
    /// `/`
    Up,
    /// `\`
    Down,
}

impl Bond {
    pub fn from_symbol(c: u8) -> Option<Bond> {
        match c {
            b'.' => Some(Bond::Dot),
            b'-' => Some(Bond::Single),
            b'=' => Some(Bond::Double),
            b'#' => Some(Bond::Triple),
            b'$' => Some(Bond::Quadruple),
            b':' => Some(Bond::Aromatic),
            b'/' => Some(Bond::Up),
            b'\\' => Some(Bond::Down),
            _ => None,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Bond::Dot => ".",
            Bond::Implicit => "",
            Bond::Single => "-",
            Bond::Double => "=",
            Bond::Triple => "#",
            Bond::Quadruple => "$",
            Bond::Aromatic => ":",
            Bond::Up => "/",
            Bond::Down => "\\",
        }
    }

    /// Electrons contributed to each endpoint's valence. Aromatic bonds count
    /// as one; the missing half is supplied by Kekulé assignment.
    pub fn order(self) -> u8 {
        match self {
            Bond::Dot => 0,
            Bond::Implicit | Bond::Single | Bond::Aromatic | Bond::Up | Bond::Down => 1,
            Bond::Double => 2,
            Bond::Triple => 3,
            Bond::Quadruple => 4,
        }
    }

    /// The label as seen from the other endpoint.
    pub fn inverse(self) -> Bond {
        match self {
            Bond::Up => Bond::Down,
            Bond::Down => Bond::Up,
            other => other,
        }
    }

    pub fn is_directional(self) -> bool {
        matches!(self, Bond::Up | Bond::Down)
    }

    /// Labels a Kekulé assignment may turn into a double bond.
    pub fn is_delocalisable(self) -> bool {
        matches!(self, Bond::Implicit | Bond::Aromatic)
    }
}

impl crate::traits::HasBondOrder for Bond {
    fn bond_order(&self) -> u8 {
        self.order()
    }
}

impl std::fmt::Display for Bond {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Bond::Implicit => f.write_str("<implicit>"),
            other => f.write_str(other.symbol()),
        }
    }
}
