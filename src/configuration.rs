//! Stereo configuration labels (`@`, `@@`, `@TH1`, … `@OH30`).

/// The geometry a [`Configuration`] describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigurationType {
    None,
    /// `@`/`@@`, resolved against the local neighbourhood once parsed.
    Implicit,
    Tetrahedral,
    ExtendedTetrahedral,
    DoubleBond,
    SquarePlanar,
    TrigonalBipyramidal,
    Octahedral,
}

impl ConfigurationType {
    /// Symbol between `@` and the number in the explicit form.
    pub fn prefix(self) -> &'static str {
        match self {
            ConfigurationType::None | ConfigurationType::Implicit => "",
            ConfigurationType::Tetrahedral => "TH",
            ConfigurationType::ExtendedTetrahedral => "AL",
            ConfigurationType::DoubleBond => "DB",
            ConfigurationType::SquarePlanar => "SP",
            ConfigurationType::TrigonalBipyramidal => "TB",
            ConfigurationType::Octahedral => "OH",
        }
    }

    /// Number of carriers the geometry arranges.
    pub fn carrier_count(self) -> usize {
        match self {
            ConfigurationType::None | ConfigurationType::Implicit => 0,
            ConfigurationType::Tetrahedral
            | ConfigurationType::ExtendedTetrahedral
            | ConfigurationType::DoubleBond
            | ConfigurationType::SquarePlanar => 4,
            ConfigurationType::TrigonalBipyramidal => 5,
            ConfigurationType::Octahedral => 6,
        }
    }

    /// Number of configurations of this geometry.
    pub fn count(self) -> usize {
        self.span().1
    }

    // (first ordinal, number of configurations)
    fn span(self) -> (usize, usize) {
        match self {
            ConfigurationType::None => (0, 1),
            ConfigurationType::Implicit => (1, 2),
            ConfigurationType::Tetrahedral => (3, 2),
            ConfigurationType::ExtendedTetrahedral => (5, 2),
            ConfigurationType::DoubleBond => (7, 2),
            ConfigurationType::SquarePlanar => (9, 3),
            ConfigurationType::TrigonalBipyramidal => (12, 20),
            ConfigurationType::Octahedral => (32, 30),
        }
    }

    fn from_prefix(prefix: &str) -> Option<ConfigurationType> {
        match prefix {
            "TH" => Some(ConfigurationType::Tetrahedral),
            "AL" => Some(ConfigurationType::ExtendedTetrahedral),
            "DB" => Some(ConfigurationType::DoubleBond),
            "SP" => Some(ConfigurationType::SquarePlanar),
            "TB" => Some(ConfigurationType::TrigonalBipyramidal),
            "OH" => Some(ConfigurationType::Octahedral),
            _ => None,
        }
    }
}

/// One of the 62 stereo labels, in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[repr(u8)]
pub enum Configuration {
    #[default]
    Unknown,
    AntiClockwise,
    Clockwise,
    Th1,
    Th2,
    Al1,
    Al2,
    Db1,
    Db2,
    Sp1,
    Sp2,
    Sp3,
    Tb1,
    Tb2,
    Tb3,
    Tb4,
    Tb5,
    Tb6,
    Tb7,
    Tb8,
    Tb9,
    Tb10,
    Tb11,
    Tb12,
    Tb13,
    Tb14,
    Tb15,
    Tb16,
    Tb17,
    Tb18,
    Tb19,
    Tb20,
    Oh1,
    Oh2,
    Oh3,
    Oh4,
    Oh5,
    Oh6,
    Oh7,
    Oh8,
    Oh9,
    Oh10,
    Oh11,
    Oh12,
    Oh13,
    Oh14,
    Oh15,
    Oh16,
    Oh17,
    Oh18,
    Oh19,
    Oh20,
    Oh21,
    Oh22,
    Oh23,
    Oh24,
    Oh25,
    Oh26,
    Oh27,
    Oh28,
    Oh29,
    Oh30,
}

static ALL: [Configuration; 62] = [
    Configuration::Unknown,
    Configuration::AntiClockwise,
    Configuration::Clockwise,
    Configuration::Th1,
    Configuration::Th2,
    Configuration::Al1,
    Configuration::Al2,
    Configuration::Db1,
    Configuration::Db2,
    Configuration::Sp1,
    Configuration::Sp2,
    Configuration::Sp3,
    Configuration::Tb1,
    Configuration::Tb2,
    Configuration::Tb3,
    Configuration::Tb4,
    Configuration::Tb5,
    Configuration::Tb6,
    Configuration::Tb7,
    Configuration::Tb8,
    Configuration::Tb9,
    Configuration::Tb10,
    Configuration::Tb11,
    Configuration::Tb12,
    Configuration::Tb13,
    Configuration::Tb14,
    Configuration::Tb15,
    Configuration::Tb16,
    Configuration::Tb17,
    Configuration::Tb18,
    Configuration::Tb19,
    Configuration::Tb20,
    Configuration::Oh1,
    Configuration::Oh2,
    Configuration::Oh3,
    Configuration::Oh4,
    Configuration::Oh5,
    Configuration::Oh6,
    Configuration::Oh7,
    Configuration::Oh8,
    Configuration::Oh9,
    Configuration::Oh10,
    Configuration::Oh11,
    Configuration::Oh12,
    Configuration::Oh13,
    Configuration::Oh14,
    Configuration::Oh15,
    Configuration::Oh16,
    Configuration::Oh17,
    Configuration::Oh18,
    Configuration::Oh19,
    Configuration::Oh20,
    Configuration::Oh21,
    Configuration::Oh22,
    Configuration::Oh23,
    Configuration::Oh24,
    Configuration::Oh25,
    Configuration::Oh26,
    Configuration::Oh27,
    Configuration::Oh28,
    Configuration::Oh29,
    Configuration::Oh30,
];

static SYMBOLS: [&str; 62] = [
    "", "@", "@@", "@TH1", "@TH2", "@AL1", "@AL2", "@DB1", "@DB2", "@SP1", "@SP2", "@SP3",
    "@TB1", "@TB2", "@TB3", "@TB4", "@TB5", "@TB6", "@TB7", "@TB8", "@TB9", "@TB10", "@TB11",
    "@TB12", "@TB13", "@TB14", "@TB15", "@TB16", "@TB17", "@TB18", "@TB19", "@TB20", "@OH1",
    "@OH2", "@OH3", "@OH4", "@OH5", "@OH6", "@OH7", "@OH8", "@OH9", "@OH10", "@OH11", "@OH12",
    "@OH13", "@OH14", "@OH15", "@OH16", "@OH17", "@OH18", "@OH19", "@OH20", "@OH21", "@OH22",
    "@OH23", "@OH24", "@OH25", "@OH26", "@OH27", "@OH28", "@OH29", "@OH30",
];

impl Configuration {
    pub fn ordinal(self) -> usize {
        self as usize
    }

    pub fn config_type(self) -> ConfigurationType {
        match self.ordinal() {
            0 => ConfigurationType::None,
            1..=2 => ConfigurationType::Implicit,
            3..=4 => ConfigurationType::Tetrahedral,
            5..=6 => ConfigurationType::ExtendedTetrahedral,
            7..=8 => ConfigurationType::DoubleBond,
            9..=11 => ConfigurationType::SquarePlanar,
            12..=31 => ConfigurationType::TrigonalBipyramidal,
            _ => ConfigurationType::Octahedral,
        }
    }

    /// The `n`th (1-based) configuration of a geometry; `@` and `@@` are
    /// numbers 1 and 2 of [`ConfigurationType::Implicit`].
    pub fn of(kind: ConfigurationType, n: usize) -> Option<Configuration> {
        let (first, count) = kind.span();
        if n == 0 || n > count {
            return None;
        }
        Some(ALL[first + n - 1])
    }

    /// Position within the geometry, 1-based.
    pub fn number(self) -> usize {
        self.ordinal() - self.config_type().span().0 + 1
    }

    /// Text form including the leading `@`; empty for [`Configuration::Unknown`].
    pub fn symbol(self) -> &'static str {
        SYMBOLS[self.ordinal()]
    }

    pub fn from_symbol(symbol: &str) -> Option<Configuration> {
        let rest = symbol.strip_prefix('@')?;
        match rest {
            "" => return Some(Configuration::AntiClockwise),
            "@" => return Some(Configuration::Clockwise),
            _ => {}
        }
        if rest.len() < 3 || !rest.is_char_boundary(2) {
            return None;
        }
        let (prefix, digits) = rest.split_at(2);
        if !digits.bytes().all(|b| b.is_ascii_digit()) || digits.starts_with('0') {
            return None;
        }
        let kind = ConfigurationType::from_prefix(prefix)?;
        Configuration::of(kind, digits.parse().ok()?)
    }

    /// Concrete form of `@`/`@@` for a given geometry. Already explicit
    /// configurations are returned unchanged.
    pub fn resolve(self, kind: ConfigurationType) -> Option<Configuration> {
        match self.config_type() {
            ConfigurationType::Implicit => Configuration::of(kind, self.number()),
            ConfigurationType::None => None,
            _ => Some(self),
        }
    }

    /// `@`/`@@` where the shorthand means the same thing, otherwise `self`.
    pub fn shorthand(self) -> Configuration {
        match self {
            Configuration::Th1 | Configuration::Al1 => Configuration::AntiClockwise,
            Configuration::Th2 | Configuration::Al2 => Configuration::Clockwise,
            other => other,
        }
    }
}

impl std::fmt::Display for Configuration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.symbol())
    }
}
