//! Typed ENSDF records and the raw line blocks they are built from
//!
//! Every record is built from exactly the lines that belong to it, and never
//! looks at the lines of any other record.
//!
//! | Tag (col 8) | Record                          |
//! | ----------- | ------------------------------- |
//! | C, D, T (col 7) | [Comment]                   |
//! | P           | [Parent]                        |
//! | N           | [Normalisation]                 |
//! | L           | [Level]                         |
//! | B           | [Beta] with [BetaKind::Minus]   |
//! | E           | [Beta] with [BetaKind::Plus]    |
//! | A           | [Alpha]                         |
//! | G           | [Gamma]                         |

// Modules
mod alpha;
mod beta;
mod comment;
mod gamma;
mod level;
mod normalisation;
mod parent;

// Flatten
pub use alpha::Alpha;
pub use beta::{Beta, BetaKind, PositronCapture};
pub use comment::Comment;
pub use gamma::Gamma;
pub use level::{Level, METASTABLE_HALF_LIFE};
pub use normalisation::Normalisation;
pub use parent::Parent;

// ensdf modules
use ensdf_utils::ColumnExt;

// internal modules
use crate::arena::Handle;
use crate::decoder::Fields;
use crate::nuclide::Nuclide;

// external crates
use serde::Serialize;

/// Emissions below this probability per disintegration are negligible
pub const SIGNIFICANCE_THRESHOLD: f64 = 1e-10;

/// Kinds of record that are recognised, anything else is skipped
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum RecordType {
    Comment,
    Parent,
    Normalisation,
    Level,
    BetaMinus,
    BetaPlus,
    Alpha,
    Gamma,
}

impl RecordType {
    /// Classify a line from its comment marker (col 7) and tag (col 8)
    ///
    /// ```rust
    /// # use ensdf_decay::RecordType;
    /// assert_eq!(RecordType::from_columns(' ', 'G'), Some(RecordType::Gamma));
    /// assert_eq!(RecordType::from_columns('c', 'G'), Some(RecordType::Comment));
    /// assert_eq!(RecordType::from_columns('P', 'N'), None);
    /// assert_eq!(RecordType::from_columns(' ', 'Q'), None);
    /// ```
    pub fn from_columns(marker: char, tag: char) -> Option<Self> {
        match (marker.to_ascii_uppercase(), tag.to_ascii_uppercase()) {
            ('C' | 'D' | 'T', _) => Some(Self::Comment),
            (' ', 'P') => Some(Self::Parent),
            (' ', 'N') => Some(Self::Normalisation),
            (' ', 'L') => Some(Self::Level),
            (' ', 'B') => Some(Self::BetaMinus),
            (' ', 'E') => Some(Self::BetaPlus),
            (' ', 'A') => Some(Self::Alpha),
            (' ', 'G') => Some(Self::Gamma),
            _ => None,
        }
    }

    /// Classify a full ENSDF line
    pub fn from_line(line: &str) -> Option<Self> {
        Self::from_columns(line.column_char(7), line.column_char(8))
    }
}

impl std::fmt::Display for RecordType {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let s = match self {
            Self::Comment => "Comment",
            Self::Parent => "Parent",
            Self::Normalisation => "Normalisation",
            Self::Level => "Level",
            Self::BetaMinus => "Beta-",
            Self::BetaPlus => "EC/Beta+",
            Self::Alpha => "Alpha",
            Self::Gamma => "Gamma",
        };
        write!(f, "{s}")
    }
}

/// Raw line block shared by every typed record
///
/// The first line is the primary record and any others are continuation
/// records of the same type.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// Type of record
    pub kind: RecordType,
    /// Nuclide identifier from columns 1-5 of the primary line
    pub nucid: String,
    /// Every line of the record
    pub lines: Vec<String>,
}

impl Record {
    /// Start a new block from its primary line
    pub fn new(kind: RecordType, line: &str) -> Self {
        Self {
            kind,
            nucid: line.column(1, 5).to_string(),
            lines: vec![line.to_string()],
        }
    }

    /// Append a continuation line
    pub fn push(&mut self, line: &str) {
        self.lines.push(line.to_string());
    }

    pub(crate) fn fields(&self) -> Fields<'_> {
        Fields::new(&self.lines)
    }

    /// Nuclide named by the NUCID, if it can be interpreted
    pub fn nuclide(&self) -> Option<Nuclide> {
        Nuclide::from_nucid(&self.nucid)
    }

    /// Atomic number from the NUCID, zero if unknown
    pub fn z(&self) -> u8 {
        self.nuclide().map_or(0, |n| n.z)
    }

    /// Mass number from the NUCID, zero if unknown
    pub fn a(&self) -> u16 {
        self.nuclide().map_or(0, |n| n.mass)
    }
}

impl std::fmt::Display for Record {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.lines.join("\n"))
    }
}

/// Reference to any record of the decay scheme, in file order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum RecordId {
    Comment(Handle<Comment>),
    Parent(Handle<Parent>),
    Normalisation(Handle<Normalisation>),
    Level(Handle<Level>),
    Beta(Handle<Beta>),
    Alpha(Handle<Alpha>),
    Gamma(Handle<Gamma>),
}

/// Reference to an emission record
///
/// Emissions are members of a parent, a normalisation, and a level at the
/// same time. This is the key used for all three memberships.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum EmissionId {
    Beta(Handle<Beta>),
    Alpha(Handle<Alpha>),
    Gamma(Handle<Gamma>),
}

impl From<EmissionId> for RecordId {
    fn from(id: EmissionId) -> Self {
        match id {
            EmissionId::Beta(h) => RecordId::Beta(h),
            EmissionId::Alpha(h) => RecordId::Alpha(h),
            EmissionId::Gamma(h) => RecordId::Gamma(h),
        }
    }
}

/// Endpoint energy from the parent Q-value when the field is blank
///
/// Positron emission needs another two electron masses, and anything that
/// comes out negative is clamped to zero.
pub(crate) fn endpoint_energy(
    q_value: f64,
    parent_energy: f64,
    level_energy: f64,
    positron: bool,
) -> f64 {
    let mut energy = q_value + parent_energy - level_energy;
    if positron {
        energy -= 2.0 * ELECTRON_MASS;
    }
    energy.max(0.0)
}

/// Electron rest mass energy (keV)
pub(crate) const ELECTRON_MASS: f64 = 510.998_95;
