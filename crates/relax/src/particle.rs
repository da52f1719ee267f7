//! Secondary particles emitted by relaxation cascades

// internal modules
use crate::error::{Error, Result};

// external crates
use serde::Serialize;

/// Type of particle emitted during atomic relaxation
///
/// Fluorescence produces photons, Auger and Coster-Kronig transitions produce
/// electrons. Nothing else comes out of a relaxation cascade.
///
/// ```rust
/// # use ensdf_relax::ParticleKind;
/// assert_eq!(ParticleKind::try_from("p").unwrap(), ParticleKind::Photon);
/// assert_eq!(ParticleKind::try_from("electron").unwrap(), ParticleKind::Electron);
/// assert_eq!(ParticleKind::Electron.charge(), -1);
/// ```
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum ParticleKind {
    /// Fluorescent x-ray
    Photon,
    /// Auger or Coster-Kronig electron
    Electron,
}

impl ParticleKind {
    /// Charge of the particle in units of the elementary charge
    pub fn charge(&self) -> i8 {
        match self {
            ParticleKind::Photon => 0,
            ParticleKind::Electron => -1,
        }
    }
}

impl TryFrom<&str> for ParticleKind {
    type Error = Error;

    fn try_from(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "p" | "photon" | "x" | "xray" | "x-ray" => Ok(ParticleKind::Photon),
            "e" | "electron" | "auger" => Ok(ParticleKind::Electron),
            _ => Err(Error::FailedToInferParticle(s.to_string())),
        }
    }
}

impl std::fmt::Display for ParticleKind {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            ParticleKind::Photon => write!(f, "photon"),
            ParticleKind::Electron => write!(f, "electron"),
        }
    }
}

/// Descriptor for a particle leaving the relaxation site
///
/// These are handed on to whatever transports particles downstream.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct RelaxationParticle {
    /// Particle type
    pub kind: ParticleKind,
    /// Kinetic energy (keV)
    pub energy: f64,
}

impl RelaxationParticle {
    /// Fluorescent photon of a given energy (keV)
    pub fn photon(energy: f64) -> Self {
        Self {
            kind: ParticleKind::Photon,
            energy,
        }
    }

    /// Auger electron of a given energy (keV)
    pub fn electron(energy: f64) -> Self {
        Self {
            kind: ParticleKind::Electron,
            energy,
        }
    }
}
