//! Relaxation cascades following an atomic shell vacancy

// standard library
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

// internal modules
use crate::particle::{ParticleKind, RelaxationParticle};
use crate::shell::Shell;

// external crates
use log::trace;
use rand::RngCore;
use serde::Serialize;

/// Generator of atomic relaxation cascades
///
/// This is the external source of atomic data, typically backed by tabulated
/// transition probabilities for every element. Decay records never read the
/// tables directly and only ever ask for:
///
/// - the number of shells tabulated for an element
/// - the binding energy of a shell
/// - a sampled cascade given an initial vacancy
///
/// Elements or shells that are not tabulated are not an error. Returning `0`
/// shells, `None` for a binding energy, or an empty cascade are all valid.
pub trait AtomicRelaxation: std::fmt::Debug + Send + Sync {
    /// Number of shells with relaxation data for atomic number `z`
    fn shell_count(&self, z: u8) -> usize;

    /// Binding energy (keV) of a shell for atomic number `z`
    fn binding_energy(&self, z: u8, shell: Shell) -> Option<f64>;

    /// Sample every particle emitted as the vacancy in `shell` is filled
    ///
    /// Particles are returned regardless of energy. Applying transport
    /// cutoffs is the responsibility of the caller.
    fn cascade(&self, z: u8, shell: Shell, rng: &mut dyn RngCore) -> Vec<RelaxationParticle>;
}

/// Transport cutoff energies (keV)
///
/// Anything emitted below the cutoff for its particle type is not worth
/// transporting and is deposited locally instead.
#[derive(Debug, Default, Copy, Clone, PartialEq, Serialize)]
pub struct Cutoffs {
    /// Low energy cutoff for electrons
    pub electron: f64,
    /// Low energy cutoff for photons
    pub photon: f64,
}

impl Cutoffs {
    /// Cutoffs for electrons and photons (keV)
    pub fn new(electron: f64, photon: f64) -> Self {
        Self { electron, photon }
    }

    /// The cutoff relevant to a particle type
    pub fn threshold(&self, kind: ParticleKind) -> f64 {
        match kind {
            ParticleKind::Photon => self.photon,
            ParticleKind::Electron => self.electron,
        }
    }
}

/// Records able to trigger an atomic relaxation cascade
pub trait Relax {
    /// Sample the relaxation of a vacancy in `shell`
    ///
    /// Every particle at or above the relevant cutoff is appended to
    /// `particles`. Anything below is added to `deposited` as locally absorbed
    /// energy (keV).
    ///
    /// Both outputs are owned by the caller and are only ever appended to, so
    /// they may be reused across calls.
    fn relax(
        &self,
        shell: Shell,
        cutoffs: Cutoffs,
        rng: &mut dyn RngCore,
        deposited: &mut f64,
        particles: &mut Vec<RelaxationParticle>,
    );

    /// Number of times `relax()` has been called on this record
    fn relaxations(&self) -> u64;
}

/// Atomic number and relaxation data for the atom left after a decay
///
/// Shared by every record able to relax. The generator is optional, and
/// without it every relaxation is a no-op.
///
/// The call counter is atomic so that a fully built decay scheme may be
/// sampled from several threads at once. It is bookkeeping only and has no
/// effect on the physics.
#[derive(Debug, Default)]
pub struct AtomicContext {
    /// Atomic number of the relaxing atom
    pub z: u8,
    generator: Option<Arc<dyn AtomicRelaxation>>,
    count: AtomicU64,
}

impl AtomicContext {
    /// Context for atomic number `z` with an optional cascade generator
    pub fn new(z: u8, generator: Option<Arc<dyn AtomicRelaxation>>) -> Self {
        Self {
            z,
            generator,
            count: AtomicU64::new(0),
        }
    }

    /// The cascade generator, if relaxation data are available
    pub fn generator(&self) -> Option<&Arc<dyn AtomicRelaxation>> {
        self.generator.as_ref()
    }

    /// Number of shells tabulated for this atom
    pub fn shell_count(&self) -> usize {
        self.generator
            .as_ref()
            .map_or(0, |generator| generator.shell_count(self.z))
    }

    /// Binding energy (keV) of a shell, zero if unknown
    pub fn binding_energy(&self, shell: Shell) -> f64 {
        self.generator
            .as_ref()
            .and_then(|generator| generator.binding_energy(self.z, shell))
            .unwrap_or(0.0)
    }

    /// Sample a cascade and split the results by the cutoffs
    ///
    /// See [Relax::relax()] for the contract. Atoms or shells without data
    /// deposit nothing and emit nothing.
    pub fn relax(
        &self,
        shell: Shell,
        cutoffs: Cutoffs,
        rng: &mut dyn RngCore,
        deposited: &mut f64,
        particles: &mut Vec<RelaxationParticle>,
    ) {
        self.count.fetch_add(1, Ordering::Relaxed);

        let Some(generator) = &self.generator else {
            return;
        };

        if shell.index() >= generator.shell_count(self.z) {
            trace!("No relaxation data for Z={} {shell} shell", self.z);
            return;
        }

        for particle in generator.cascade(self.z, shell, rng) {
            if particle.energy >= cutoffs.threshold(particle.kind) {
                particles.push(particle);
            } else {
                *deposited += particle.energy;
            }
        }
    }

    /// Number of relaxations sampled so far
    pub fn relaxations(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    /// Two-shell atom that always emits the same K cascade
    #[derive(Debug)]
    struct FixedCascade;

    impl AtomicRelaxation for FixedCascade {
        fn shell_count(&self, z: u8) -> usize {
            if z == 28 {
                2
            } else {
                0
            }
        }

        fn binding_energy(&self, z: u8, shell: Shell) -> Option<f64> {
            match (z, shell) {
                (28, Shell::K) => Some(8.333),
                (28, Shell::L1) => Some(1.008),
                _ => None,
            }
        }

        fn cascade(&self, _z: u8, _shell: Shell, _rng: &mut dyn RngCore) -> Vec<RelaxationParticle> {
            vec![
                RelaxationParticle::photon(7.478),
                RelaxationParticle::electron(6.2),
                RelaxationParticle::photon(0.85),
                RelaxationParticle::electron(0.1),
            ]
        }
    }

    fn nickel() -> AtomicContext {
        AtomicContext::new(28, Some(Arc::new(FixedCascade)))
    }

    #[test]
    fn cutoffs_split_particles() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut deposited = 0.0;
        let mut particles = Vec::new();

        let cutoffs = Cutoffs::new(1.0, 1.0);
        nickel().relax(Shell::K, cutoffs, &mut rng, &mut deposited, &mut particles);

        assert_eq!(
            particles,
            vec![
                RelaxationParticle::photon(7.478),
                RelaxationParticle::electron(6.2)
            ]
        );
        assert!((deposited - 0.95).abs() < 1e-12);
    }

    #[test]
    fn particle_on_cutoff_is_emitted() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut deposited = 0.0;
        let mut particles = Vec::new();

        let cutoffs = Cutoffs::new(6.2, 7.478);
        nickel().relax(Shell::K, cutoffs, &mut rng, &mut deposited, &mut particles);

        assert_eq!(particles.len(), 2);
        assert!((deposited - 0.95).abs() < 1e-12);
    }

    #[test]
    fn missing_data_is_a_no_op() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut deposited = 0.0;
        let mut particles = Vec::new();

        // shell beyond the tabulated data
        let context = nickel();
        context.relax(Shell::M, Cutoffs::default(), &mut rng, &mut deposited, &mut particles);

        // element without data
        let context = AtomicContext::new(3, Some(Arc::new(FixedCascade)));
        context.relax(Shell::K, Cutoffs::default(), &mut rng, &mut deposited, &mut particles);

        // no generator at all
        let context = AtomicContext::new(28, None);
        context.relax(Shell::K, Cutoffs::default(), &mut rng, &mut deposited, &mut particles);

        assert_eq!(deposited, 0.0);
        assert!(particles.is_empty());
        assert_eq!(context.relaxations(), 1);
    }

    #[test]
    fn counts_every_call() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut deposited = 0.0;
        let mut particles = Vec::new();

        let context = nickel();
        for _ in 0..5 {
            context.relax(Shell::K, Cutoffs::default(), &mut rng, &mut deposited, &mut particles);
        }

        assert_eq!(context.relaxations(), 5);
        assert_eq!(particles.len(), 20);
    }

    #[test]
    fn binding_energies() {
        let context = nickel();
        assert_eq!(context.shell_count(), 2);
        assert_eq!(context.binding_energy(Shell::K), 8.333);
        assert_eq!(context.binding_energy(Shell::M), 0.0);
        assert_eq!(AtomicContext::new(28, None).binding_energy(Shell::K), 0.0);
    }
}
