//! Continuous spectrum sampling

use rand::RngCore;

/// Sampling table for a continuous energy spectrum
///
/// Beta decays emit a continuum of energies up to the endpoint. How that
/// spectrum is tabulated and sampled (alias tables, inverse CDF, etc...) is
/// left to the implementor. Decay records only hold on to a shared reference
/// so that it can be found again at sampling time.
///
/// Implementations must be safe to share between threads, since the same
/// decay scheme is read by every sampling context.
pub trait SpectrumTable: std::fmt::Debug + Send + Sync {
    /// Draw an energy (keV) from the spectrum
    fn sample(&self, rng: &mut dyn RngCore) -> f64;
}
