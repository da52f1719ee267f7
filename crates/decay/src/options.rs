//! Configuration for building a decay scheme

// standard library
use std::path::PathBuf;
use std::sync::Arc;

// ensdf modules
use ensdf_relax::AtomicRelaxation;
use ensdf_utils::f;

// internal modules
use crate::error::Error;
use crate::nuclide::Nuclide;

/// Environment variable for the directory of per-nuclide ENSDF files
pub const DATA_DIR_VAR: &str = "ENSDF_DATA_DIR";

/// Directory used when [DATA_DIR_VAR] is not set
pub const DEFAULT_DATA_DIR: &str = "./data/ensdf";

/// Source of atomic relaxation data for the scheme
///
/// | Mode    | X-ray and Auger lines                           |
/// | ------- | ----------------------------------------------- |
/// | `Eadl`  | sampled from external relaxation tables         |
/// | `Ensdf` | merged from the comment records of the file     |
/// | `None`  | not provided at all                             |
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum RelaxationMode {
    #[default]
    Eadl,
    Ensdf,
    None,
}

impl std::str::FromStr for RelaxationMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "eadl" => Ok(Self::Eadl),
            "ensdf" => Ok(Self::Ensdf),
            "none" => Ok(Self::None),
            _ => Err(Error::UnknownRelaxationMode(s.to_string())),
        }
    }
}

impl std::fmt::Display for RelaxationMode {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let s = match self {
            Self::Eadl => "eadl",
            Self::Ensdf => "ensdf",
            Self::None => "none",
        };
        write!(f, "{s}")
    }
}

/// Options for reading and building a decay scheme
///
/// The fields are left public for direct use, but a builder is also
/// implemented for chained setter calls.
///
/// ```rust
/// # use ensdf_decay::{Options, RelaxationMode};
/// let options = Options::builder()
///     .path("data/Co60.txt")
///     .relaxation(RelaxationMode::Ensdf)
///     .allow_multi_transition(true)
///     .verbosity(1)
///     .build();
///
/// assert_eq!(options.relaxation, RelaxationMode::Ensdf);
/// assert!(options.allow_multi_transition);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Options {
    /// Explicit path to the ENSDF file
    pub path: Option<PathBuf>,
    /// Source of X-ray and Auger emissions
    pub relaxation: RelaxationMode,
    /// Allow a gamma to be emitted alongside others from the same level
    pub allow_multi_transition: bool,
    /// Diagnostic output level, 0 for silent
    pub verbosity: usize,
    /// External cascade generator shared by every relaxing record
    pub atomic_relaxation: Option<Arc<dyn AtomicRelaxation>>,
}

impl Options {
    /// Start a new [OptionsBuilder] with default values
    pub fn builder() -> OptionsBuilder {
        OptionsBuilder::default()
    }

    /// Path to the ENSDF file for a nuclide
    ///
    /// An explicit path always wins. Otherwise this is `<dir>/<Nuclide>.txt`,
    /// where the directory is taken from `ENSDF_DATA_DIR` if set.
    ///
    /// ```rust
    /// # use ensdf_decay::{Options, Nuclide};
    /// # use std::path::PathBuf;
    /// # use std::str::FromStr;
    /// let nuclide = Nuclide::from_str("co-60").unwrap();
    /// let options = Options::builder().path("/tmp/cobalt.ens").build();
    ///
    /// assert_eq!(options.file_path(&nuclide), PathBuf::from("/tmp/cobalt.ens"));
    /// ```
    pub fn file_path(&self, nuclide: &Nuclide) -> PathBuf {
        if let Some(path) = &self.path {
            return path.clone();
        }

        let dir = std::env::var(DATA_DIR_VAR).unwrap_or_else(|_| DEFAULT_DATA_DIR.to_string());
        PathBuf::from(dir).join(f!("{}.txt", nuclide.name()))
    }
}

/// Builder implementation for [Options]
///
/// Any number of parameters can be set, including none. Call
/// [build()](OptionsBuilder::build) to get the final [Options].
#[derive(Debug, Default)]
pub struct OptionsBuilder {
    options: Options,
}

impl OptionsBuilder {
    /// Create a new instance of the builder with default parameters
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the [Options] type
    pub fn build(self) -> Options {
        self.options
    }

    /// Explicit path to the ENSDF file
    pub fn path(mut self, path: impl Into<PathBuf>) -> Self {
        self.options.path = Some(path.into());
        self
    }

    /// Source of X-ray and Auger emissions
    ///
    /// - eadl (default)
    /// - ensdf
    /// - none
    pub fn relaxation(mut self, mode: RelaxationMode) -> Self {
        self.options.relaxation = mode;
        self
    }

    /// Allow more than one transition per disintegration from a level
    ///
    /// Levels that emit more intensity than they receive then use the
    /// incoming intensity for the multiple-transition probability.
    pub fn allow_multi_transition(mut self, allow: bool) -> Self {
        self.options.allow_multi_transition = allow;
        self
    }

    /// Diagnostic output level
    ///
    /// 0 is silent, 1 summarises, 2 reports every record, and 3+ dumps raw
    /// line blocks. Warnings are always reported.
    pub fn verbosity(mut self, verbosity: usize) -> Self {
        self.options.verbosity = verbosity;
        self
    }

    /// External cascade generator for atomic relaxation
    pub fn atomic_relaxation(mut self, generator: Arc<dyn AtomicRelaxation>) -> Self {
        self.options.atomic_relaxation = Some(generator);
        self
    }
}
