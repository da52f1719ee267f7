//! Build normalised radionuclide decay schemes from ENSDF files
//!
//! An ENSDF decay data set is a flat list of 80-column records. This crate
//! reads one radionuclide into a [DecayScheme], linking every record into a
//! consistent structure and normalising the emission intensities to absolute
//! probabilities per parent disintegration.
//!
//! | Record type         | Description                                       |
//! | ------------------- | ------------------------------------------------- |
//! | [Comment]           | free text, mined for X-ray and Auger lines        |
//! | [Parent]            | the decaying nuclide, half-life, and Q-value      |
//! | [Normalisation]     | multipliers from relative to absolute intensities |
//! | [Level]             | an energy level of the daughter                   |
//! | [Beta]              | Beta- or EC/Beta+ feeding a level                 |
//! | [Alpha]             | alpha emission feeding a level                    |
//! | [Gamma]             | gamma transition de-exciting a level              |
//!
//! Every emission belongs to exactly one parent, one normalisation, and one
//! level, and these links are available in both directions through the
//! scheme.
//!
//! # Quickstart example
//!
//! ```rust, no_run
//! # use ensdf_decay::{DecayScheme, Options, RelaxationMode};
//! // Read from the default data directory
//! let options = Options::builder()
//!     .relaxation(RelaxationMode::Ensdf)
//!     .verbosity(1)
//!     .build();
//!
//! let scheme = DecayScheme::read("Fr221", options).unwrap();
//!
//! // Alpha emissions per disintegration
//! for alpha in scheme.alpha_records() {
//!     println!("{:.1} keV  {:.5}", alpha.energy, alpha.intensity);
//! }
//!
//! // X-ray lines clustered from the comments
//! for (energy, intensity) in scheme.xray_lines().iter() {
//!     println!("{energy:.3} keV  {intensity:.5}");
//! }
//! ```
//!
//! # Finding data files
//!
//! Files are looked up in the following order:
//!
//! 1. An explicit path set with [OptionsBuilder::path()]
//! 2. `<name>.txt` in the directory set by the `ENSDF_DATA_DIR` environment
//!    variable
//! 3. `<name>.txt` in `./data/ensdf`
//!
//! where `<name>` is the nuclide name, e.g. `Co60` or `Tc99m`.
#![deny(missing_debug_implementations)]

// Modules
mod arena;
mod clusters;
pub mod decoder;
mod error;
mod normalise;
mod nuclide;
mod options;
mod reader;
mod records;
mod relation;
mod scheme;

// Flatten
#[doc(inline)]
pub use arena::{Arena, Handle};

#[doc(inline)]
pub use clusters::{cluster_comments, Cluster, EmissionLines};

#[doc(inline)]
pub use error::{Error, Result};

#[doc(inline)]
pub use nuclide::{atomic_number, element_symbol, IsomerState, Nuclide};

#[doc(inline)]
pub use options::{Options, OptionsBuilder, RelaxationMode, DATA_DIR_VAR, DEFAULT_DATA_DIR};

#[doc(inline)]
pub use records::{
    Alpha, Beta, BetaKind, Comment, EmissionId, Gamma, Level, Normalisation, Parent,
    PositronCapture, Record, RecordId, RecordType, METASTABLE_HALF_LIFE,
    SIGNIFICANCE_THRESHOLD,
};

#[doc(inline)]
pub use relation::Relation;

#[doc(inline)]
pub use scheme::DecayScheme;

// Collaborator interfaces needed to sample from a scheme
#[doc(no_inline)]
pub use ensdf_relax::{
    AtomicRelaxation, Cutoffs, ParticleKind, Relax, RelaxationParticle, Shell, SpectrumTable,
};
