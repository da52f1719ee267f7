//! Atomic relaxation and spectrum sampling interfaces
//!
//! Decay scheme records do not know how to sample an atomic relaxation
//! cascade or a continuous beta spectrum themselves. These are supplied by
//! external collaborators, and this crate defines the contracts between them.
//!
//! | Collaborator         | Purpose                                                |
//! | -------------------- | ------------------------------------------------------ |
//! | [AtomicRelaxation]   | binding energies and cascades for a vacancy in a shell |
//! | [SpectrumTable]      | sampling of continuous beta spectra                    |
//! | [rand::RngCore]      | uniform random draws                                   |
//!
//! Anything that can trigger a relaxation cascade implements [Relax]. The
//! bookkeeping shared by all of them lives in [AtomicContext].
//!
//! ## Relaxing a vacancy
//!
//! ```rust
//! # use ensdf_relax::{AtomicContext, Cutoffs, Shell};
//! # use rand::{rngs::StdRng, SeedableRng};
//! // No relaxation tables available, so nothing happens
//! let context = AtomicContext::new(28, None);
//!
//! let mut rng = StdRng::seed_from_u64(1);
//! let mut deposited = 0.0;
//! let mut particles = Vec::new();
//!
//! context.relax(Shell::K, Cutoffs::default(), &mut rng, &mut deposited, &mut particles);
//!
//! assert_eq!(deposited, 0.0);
//! assert!(particles.is_empty());
//! ```

// Modules
mod cascade;
mod error;
mod particle;
mod shell;
mod spectrum;

// Flatten
#[doc(inline)]
pub use cascade::{AtomicContext, AtomicRelaxation, Cutoffs, Relax};

#[doc(inline)]
pub use error::{Error, Result};

#[doc(inline)]
pub use particle::{ParticleKind, RelaxationParticle};

#[doc(inline)]
pub use shell::Shell;

#[doc(inline)]
pub use spectrum::SpectrumTable;
