//! Element lookup: symbols, default valences and the organic/aromatic
//! subsets permitted outside brackets.

/// Chemical elements 1–118 plus the `*` wildcard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[repr(u8)]
pub enum Element {
    /// The `*` wildcard, also used for arbitrary bracket labels.
    #[default]
    Unknown = 0,
    H,
    He,
    Li,
    Be,
    B,
    C,
    N,
    O,
    F,
    Ne,
    Na,
    Mg,
    Al,
    Si,
    P,
    S,
    Cl,
    Ar,
    K,
    Ca,
    Sc,
    Ti,
    V,
    Cr,
    Mn,
    Fe,
    Co,
    Ni,
    Cu,
    Zn,
    Ga,
    Ge,
    As,
    Se,
    Br,
    Kr,
    Rb,
    Sr,
    Y,
    Zr,
    Nb,
    Mo,
    Tc,
    Ru,
    Rh,
    Pd,
    Ag,
    Cd,
    In,
    Sn,
    Sb,
    Te,
    I,
    Xe,
    Cs,
    Ba,
    La,
    Ce,
    Pr,
    Nd,
    Pm,
    Sm,
    Eu,
    Gd,
    Tb,
    Dy,
    Ho,
    Er,
    Tm,
    Yb,
    Lu,
    Hf,
    Ta,
    W,
    Re,
    Os,
    Ir,
    Pt,
    Au,
    Hg,
    Tl,
    Pb,
    Bi,
    Po,
    At,
    Rn,
    Fr,
    Ra,
    Ac,
    Th,
    Pa,
    U,
    Np,
    Pu,
    Am,
    Cm,
    Bk,
    Cf,
    Es,
    Fm,
    Md,
    No,
    Lr,
    Rf,
    Db,
    Sg,
    Bh,
    Hs,
    Mt,
    Ds,
    Rg,
    Cn,
    Nh,
    Fl,
    Mc,
    Lv,
    Ts,
    Og,
}

// indexed by atomic number, 0 is the wildcard
static SYMBOLS: [&str; 119] = [
    "*", "H", "He", "Li", "Be", "B", "C", "N", "O", "F",
    "Ne", "Na", "Mg", "Al", "Si", "P", "S", "Cl", "Ar", "K",
    "Ca", "Sc", "Ti", "V", "Cr", "Mn", "Fe", "Co", "Ni", "Cu",
    "Zn", "Ga", "Ge", "As", "Se", "Br", "Kr", "Rb", "Sr", "Y",
    "Zr", "Nb", "Mo", "Tc", "Ru", "Rh", "Pd", "Ag", "Cd", "In",
    "Sn", "Sb", "Te", "I", "Xe", "Cs", "Ba", "La", "Ce", "Pr",
    "Nd", "Pm", "Sm", "Eu", "Gd", "Tb", "Dy", "Ho", "Er", "Tm",
    "Yb", "Lu", "Hf", "Ta", "W", "Re", "Os", "Ir", "Pt", "Au",
    "Hg", "Tl", "Pb", "Bi", "Po", "At", "Rn", "Fr", "Ra", "Ac",
    "Th", "Pa", "U", "Np", "Pu", "Am", "Cm", "Bk", "Cf", "Es",
    "Fm", "Md", "No", "Lr", "Rf", "Db", "Sg", "Bh", "Hs", "Mt",
    "Ds", "Rg", "Cn", "Nh", "Fl", "Mc", "Lv", "Ts", "Og",
];

/// Aromatic symbols defined by OpenSMILES.
const STANDARD_AROMATIC: [Element; 8] = [
    Element::B,
    Element::C,
    Element::N,
    Element::O,
    Element::P,
    Element::S,
    Element::Se,
    Element::As,
];

/// Aromatic symbols seen in the wild, accepted only by the lenient parser.
const EXTENDED_AROMATIC: [Element; 4] = [Element::Te, Element::Si, Element::Ge, Element::Sb];

impl Element {
    pub fn from_atomic_num(n: u8) -> Option<Element> {
        if n <= 118 {
            // SAFETY: Element is repr(u8) with variants 0..=118, and we checked bounds.
            Some(unsafe { std::mem::transmute::<u8, Element>(n) })
        } else {
            None
        }
    }

    /// Case-sensitive symbol lookup (`"Cl"`, not `"cl"`); `"*"` yields
    /// [`Element::Unknown`].
    pub fn from_symbol(s: &str) -> Option<Element> {
        SYMBOLS
            .iter()
            .position(|&sym| sym == s)
            .and_then(|n| Element::from_atomic_num(n as u8))
    }

    /// Lowercase (aromatic) symbol lookup. Only elements that may be written
    /// aromatic are recognised; `standard` restricts to the OpenSMILES set.
    pub fn from_aromatic_symbol(s: &str, standard: bool) -> Option<Element> {
        let matches = |e: &&Element| e.symbol().to_ascii_lowercase() == s;
        STANDARD_AROMATIC
            .iter()
            .find(matches)
            .or_else(|| {
                if standard {
                    None
                } else {
                    EXTENDED_AROMATIC.iter().find(matches)
                }
            })
            .copied()
    }

    pub fn atomic_num(self) -> u8 {
        self as u8
    }

    pub fn symbol(self) -> &'static str {
        SYMBOLS[self as usize]
    }

    /// Valences used to infer implicit hydrogens on subset atoms, in
    /// increasing order. Empty for elements that are never written bare.
    pub fn default_valences(self) -> &'static [u8] {
        match self {
            Element::H => &[1],
            Element::B => &[3],
            Element::C => &[4],
            Element::N => &[3, 5],
            Element::O => &[2],
            Element::F | Element::Cl | Element::Br | Element::At => &[1],
            Element::Si | Element::Ge => &[4],
            Element::P | Element::As => &[3, 5],
            Element::S | Element::Se | Element::Te => &[2, 4, 6],
            Element::I => &[1, 3, 5, 7],
            _ => &[],
        }
    }

    /// Elements that may appear outside brackets.
    pub fn is_organic_subset(self) -> bool {
        matches!(
            self,
            Element::Unknown
                | Element::B
                | Element::C
                | Element::N
                | Element::O
                | Element::P
                | Element::S
                | Element::F
                | Element::Cl
                | Element::Br
                | Element::I
        )
    }

    /// Elements that may appear lowercase outside brackets.
    pub fn is_aromatic_subset(self) -> bool {
        matches!(
            self,
            Element::Unknown
                | Element::B
                | Element::C
                | Element::N
                | Element::O
                | Element::P
                | Element::S
        )
    }

    pub fn is_standard_aromatic(self) -> bool {
        self == Element::Unknown || STANDARD_AROMATIC.contains(&self)
    }

    /// Lowest default valence that accommodates `bonded`.
    pub fn target_valence(self, bonded: u8) -> Option<u8> {
        self.default_valences().iter().copied().find(|&v| v >= bonded)
    }

    /// Implicit hydrogens on an unbracketed atom with the given bonded valence.
    /// Aromatic atoms contribute one electron to the delocalised system and so
    /// carry one fewer hydrogen.
    pub fn implicit_hydrogens(self, bonded: u8, aromatic: bool) -> u8 {
        let Some(target) = self.target_valence(bonded) else {
            return 0;
        };
        let h = target - bonded;
        if aromatic && h > 0 {
            h - 1
        } else {
            h
        }
    }
}

impl std::fmt::Display for Element {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.symbol())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_atomic_num_round_trip() {
        for n in 0u8..=118 {
            let e = Element::from_atomic_num(n).unwrap();
            assert_eq!(e.atomic_num(), n);
        }
    }

    #[test]
    fn from_atomic_num_boundaries() {
        assert_eq!(Element::from_atomic_num(0), Some(Element::Unknown));
        assert!(Element::from_atomic_num(119).is_none());
        assert!(Element::from_atomic_num(255).is_none());
        assert_eq!(Element::from_atomic_num(1), Some(Element::H));
        assert_eq!(Element::from_atomic_num(118), Some(Element::Og));
    }

    #[test]
    fn from_symbol_case_sensitive() {
        assert_eq!(Element::from_symbol("Fe"), Some(Element::Fe));
        assert_eq!(Element::from_symbol("*"), Some(Element::Unknown));
        assert!(Element::from_symbol("fe").is_none());
        assert!(Element::from_symbol("CL").is_none());
        assert!(Element::from_symbol("").is_none());
        assert!(Element::from_symbol("Xx").is_none());
    }

    #[test]
    fn symbol_round_trip() {
        for n in 0u8..=118 {
            let e = Element::from_atomic_num(n).unwrap();
            assert_eq!(Element::from_symbol(e.symbol()), Some(e));
        }
    }

    #[test]
    fn aromatic_symbols() {
        assert_eq!(Element::from_aromatic_symbol("se", true), Some(Element::Se));
        assert_eq!(Element::from_aromatic_symbol("as", true), Some(Element::As));
        assert_eq!(Element::from_aromatic_symbol("c", true), Some(Element::C));
        assert_eq!(Element::from_aromatic_symbol("te", true), None);
        assert_eq!(Element::from_aromatic_symbol("te", false), Some(Element::Te));
        assert_eq!(Element::from_aromatic_symbol("fe", false), None);
    }

    #[test]
    fn implicit_hydrogens_follow_default_valence() {
        assert_eq!(Element::C.implicit_hydrogens(0, false), 4);
        assert_eq!(Element::C.implicit_hydrogens(2, true), 1);
        assert_eq!(Element::N.implicit_hydrogens(2, true), 0);
        assert_eq!(Element::N.implicit_hydrogens(4, false), 1);
        assert_eq!(Element::S.implicit_hydrogens(3, false), 1);
        assert_eq!(Element::Na.implicit_hydrogens(0, false), 0);
        assert_eq!(Element::F.implicit_hydrogens(2, false), 0);
    }

    #[test]
    fn organic_subset() {
        for e in [Element::B, Element::C, Element::N, Element::Cl, Element::Unknown] {
            assert!(e.is_organic_subset());
        }
        assert!(!Element::Fe.is_organic_subset());
        assert!(!Element::Se.is_aromatic_subset());
        assert!(Element::Se.is_standard_aromatic());
    }
}
