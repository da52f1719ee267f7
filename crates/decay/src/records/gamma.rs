// standard library
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

// ensdf modules
use ensdf_relax::{AtomicContext, AtomicRelaxation, Cutoffs, Relax, RelaxationParticle, Shell};
use ensdf_utils::{f, ValueExt};

// internal modules
use crate::decoder::Fields;
use crate::error::Result;
use crate::records::Record;

// external crates
use rand::RngCore;
use serde::Serialize;

/// Gamma transition between two levels
///
/// | Field | Columns |
/// | ----- | ------- |
/// | E     | 10-19   |
/// | DE    | 20-21   |
/// | RI    | 22-29   |
/// | DRI   | 30-31   |
/// | M     | 32-41   |
/// | CC    | 56-62   |
/// | DCC   | 63-64   |
/// | TI    | 65-74   |
/// | DTI   | 75-76   |
///
/// Conversion coefficients by shell come from continuation records (`KC=`,
/// `L1C=`, `L2C=`, `L3C=`, `LC=`, `MC=`, `NC+=`), as does the internal pair
/// coefficient (`IPC=`).
///
/// A transition competes between three processes: gamma emission, internal
/// conversion, and internal pair formation. Each has its own sampling
/// counter.
#[derive(Debug, Serialize)]
pub struct Gamma {
    /// Raw line block
    #[serde(skip)]
    pub record: Record,
    /// Gamma energy (keV)
    pub energy: f64,
    /// Uncertainty on the energy (keV)
    pub energy_uncertainty: f64,
    /// Gamma emission intensity
    pub gamma_intensity: f64,
    /// Uncertainty on the gamma intensity
    pub gamma_uncertainty: f64,
    /// Total transition intensity, all processes included
    pub transition_intensity: f64,
    /// Uncertainty on the transition intensity
    pub transition_uncertainty: f64,
    /// Internal conversion intensity
    pub conversion_intensity: f64,
    /// Internal pair formation intensity
    pub pair_intensity: f64,
    /// Multipolarity
    pub multipolarity: String,
    /// Total conversion coefficient
    pub conversion_coefficient: f64,
    /// Uncertainty on the conversion coefficient
    pub conversion_uncertainty: f64,
    /// Internal pair coefficient
    pub pair_coefficient: f64,
    /// Conversion coefficients for K, L1, L2, L3, M, and N+ shells
    pub shell_coefficients: [f64; 6],
    /// Conversion intensities for K, L1, L2, L3, M, and N+ shells
    pub shell_intensities: [f64; 6],
    /// Probability of this transition given a disintegration of its level
    pub multi_transition_prob: f64,
    #[serde(skip)]
    atomic: AtomicContext,
    #[serde(skip)]
    gamma_sampled: AtomicU64,
    #[serde(skip)]
    conversion_sampled: AtomicU64,
    #[serde(skip)]
    pair_sampled: AtomicU64,
}

impl Gamma {
    /// Build from a gamma line block
    pub fn new(record: Record, generator: Option<Arc<dyn AtomicRelaxation>>) -> Self {
        let fields = record.fields();

        let mut conversion_coefficient = fields.number(56, 62);
        if conversion_coefficient == 0.0 {
            conversion_coefficient = fields.tagged("CC=", "$");
        }

        Self {
            energy: fields.number(10, 19),
            energy_uncertainty: fields.uncertainty((10, 19), (20, 21)),
            gamma_intensity: fields.number(22, 29),
            gamma_uncertainty: fields.uncertainty((22, 29), (30, 31)),
            transition_intensity: fields.number(65, 74),
            transition_uncertainty: fields.uncertainty((65, 74), (75, 76)),
            conversion_intensity: 0.0,
            pair_intensity: 0.0,
            multipolarity: fields.text(32, 41),
            conversion_coefficient,
            conversion_uncertainty: fields.uncertainty((56, 62), (63, 64)),
            pair_coefficient: fields.tagged("IPC=", "$"),
            shell_coefficients: shell_coefficients(&fields, conversion_coefficient),
            shell_intensities: [0.0; 6],
            multi_transition_prob: 0.0,
            atomic: AtomicContext::new(record.z(), generator),
            gamma_sampled: AtomicU64::new(0),
            conversion_sampled: AtomicU64::new(0),
            pair_sampled: AtomicU64::new(0),
            record,
        }
    }

    /// Atomic number of the daughter
    pub fn z(&self) -> u8 {
        self.atomic.z
    }

    /// Set the normalised gamma emission intensity
    pub fn set_gamma_intensity(&mut self, intensity: f64) {
        self.gamma_intensity = intensity.max(0.0);
    }

    /// Set the normalised total transition intensity
    pub fn set_transition_intensity(&mut self, intensity: f64) {
        self.transition_intensity = intensity.max(0.0);
    }

    /// Set the conversion intensity, shared out over the shells
    pub fn set_conversion_intensity(&mut self, intensity: f64) {
        self.conversion_intensity = intensity.max(0.0);
        let cc = self.conversion_coefficient;
        for (shell, coefficient) in self
            .shell_intensities
            .iter_mut()
            .zip(self.shell_coefficients.iter())
        {
            *shell = match cc > 0.0 {
                true => self.conversion_intensity * coefficient / cc,
                false => 0.0,
            };
        }
    }

    /// Set the internal pair formation intensity
    pub fn set_pair_intensity(&mut self, intensity: f64) {
        self.pair_intensity = intensity.max(0.0);
    }

    /// Set the probability of this transition per level disintegration
    pub fn set_multi_transition_prob(&mut self, probability: f64) {
        self.multi_transition_prob = probability.clamp(0.0, 1.0);
    }

    /// Conversion intensity for a single shell
    pub fn shell_intensity(&self, shell: Shell) -> f64 {
        self.shell_intensities[shell.index()]
    }

    /// Count one sampled gamma emission
    pub fn incr_gamma_sampled(&self) {
        self.gamma_sampled.fetch_add(1, Ordering::Relaxed);
    }

    /// Count one sampled conversion electron
    pub fn incr_conversion_sampled(&self) {
        self.conversion_sampled.fetch_add(1, Ordering::Relaxed);
    }

    /// Count one sampled internal pair
    pub fn incr_pair_sampled(&self) {
        self.pair_sampled.fetch_add(1, Ordering::Relaxed);
    }

    /// Number of sampled gamma emissions so far
    pub fn gamma_sampled(&self) -> u64 {
        self.gamma_sampled.load(Ordering::Relaxed)
    }

    /// Number of sampled conversion electrons so far
    pub fn conversion_sampled(&self) -> u64 {
        self.conversion_sampled.load(Ordering::Relaxed)
    }

    /// Number of sampled internal pairs so far
    pub fn pair_sampled(&self) -> u64 {
        self.pair_sampled.load(Ordering::Relaxed)
    }

    /// Serialise to a JSON format string
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl Relax for Gamma {
    fn relax(
        &self,
        shell: Shell,
        cutoffs: Cutoffs,
        rng: &mut dyn RngCore,
        deposited: &mut f64,
        particles: &mut Vec<RelaxationParticle>,
    ) {
        self.atomic
            .relax(shell, cutoffs, rng, deposited, particles)
    }

    fn relaxations(&self) -> u64 {
        self.atomic.relaxations()
    }
}

impl std::fmt::Display for Gamma {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let mut s = "Gamma\n".to_string();
        s += &f!(
            "  Energy           {} +/- {} keV\n",
            self.energy,
            self.energy_uncertainty
        );
        s += &f!("  Multipolarity    {}\n", self.multipolarity);
        s += &f!("  Gamma            {}\n", self.gamma_intensity.sci(5, 2));
        s += &f!("  Transition       {}\n", self.transition_intensity.sci(5, 2));
        s += &f!("  Conversion       {}\n", self.conversion_intensity.sci(5, 2));
        s += &f!("  Pair             {}\n", self.pair_intensity.sci(5, 2));
        s += &f!("  Conversion coef. {}\n", self.conversion_coefficient);
        s += &f!("  Multi-transition {}", self.multi_transition_prob);
        write!(f, "{s}")
    }
}

/// Conversion coefficients by shell from the continuation records
///
/// A total `LC=` without sub-shells is booked to L1. Whatever part of the
/// total coefficient is not accounted for by the shells goes to N+.
fn shell_coefficients(fields: &Fields, total: f64) -> [f64; 6] {
    let mut shells = [
        fields.tagged("KC=", "$"),
        fields.tagged("L1C=", "$"),
        fields.tagged("L2C=", "$"),
        fields.tagged("L3C=", "$"),
        fields.tagged("MC=", "$"),
        match fields.has_tag("NC+=") {
            true => fields.tagged("NC+=", "$"),
            false => fields.tagged("NC=", "$"),
        },
    ];

    if shells[1..4].iter().all(|c| *c == 0.0) {
        shells[1] = fields.tagged("LC=", "$");
    }

    let remainder = total - shells.iter().sum::<f64>();
    if remainder > 0.0 {
        shells[5] += remainder;
    }

    shells
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::tests::{card, record};
    use crate::records::RecordType;

    fn nickel_gamma() -> Gamma {
        let lines = vec![
            card(&[
                (1, " 60NI"),
                (8, "G"),
                (10, "1332.492"),
                (20, "4"),
                (22, "99.9826"),
                (30, "6"),
                (32, "E2"),
                (56, "1.28E-4"),
            ]),
            card(&[
                (1, " 60NI"),
                (6, "S"),
                (8, "G"),
                (10, "KC=1.15E-4$LC=1.13E-5$MC=1.5E-6"),
            ]),
            card(&[(1, " 60NI"), (6, "S"), (8, "G"), (10, "IPC=3.4E-5")]),
        ];
        Gamma::new(record(RecordType::Gamma, &lines), None)
    }

    #[test]
    fn gamma_fields() {
        let gamma = nickel_gamma();

        assert_eq!(gamma.z(), 28);
        assert_eq!(gamma.energy, 1332.492);
        assert!((gamma.energy_uncertainty - 0.004).abs() < 1e-12);
        assert_eq!(gamma.gamma_intensity, 99.9826);
        assert_eq!(gamma.multipolarity, "E2");
        assert_eq!(gamma.conversion_coefficient, 1.28e-4);
        assert_eq!(gamma.pair_coefficient, 3.4e-5);
        assert_eq!(gamma.transition_intensity, 0.0);
    }

    #[test]
    fn shell_breakdown() {
        let gamma = nickel_gamma();
        let shells = gamma.shell_coefficients;

        assert_eq!(shells[0], 1.15e-4);
        assert_eq!(shells[1], 1.13e-5);
        assert_eq!(shells[2], 0.0);
        assert_eq!(shells[4], 1.5e-6);

        // remainder of the total is booked to N+
        let sum: f64 = shells.iter().sum();
        assert!((sum - 1.28e-4).abs() < 1e-15);
        assert!(shells[5] > 0.0);
    }

    #[test]
    fn conversion_shares() {
        let mut gamma = nickel_gamma();
        gamma.set_conversion_intensity(1.28e-4);

        let total: f64 = gamma.shell_intensities.iter().sum();
        assert!((total - 1.28e-4).abs() < 1e-15);
        assert!((gamma.shell_intensity(Shell::K) - 1.15e-4).abs() < 1e-15);
    }

    #[test]
    fn blank_conversion_coefficient_uses_tag() {
        let lines = vec![
            card(&[(1, "137BA"), (8, "G"), (10, "661.657"), (22, "100")]),
            card(&[(1, "137BA"), (6, "S"), (8, "G"), (10, "CC=0.1124$KC=0.0915")]),
        ];
        let gamma = Gamma::new(record(RecordType::Gamma, &lines), None);

        assert_eq!(gamma.conversion_coefficient, 0.1124);
        assert_eq!(gamma.shell_coefficients[0], 0.0915);
    }

    #[test]
    fn counters_are_independent() {
        let gamma = nickel_gamma();
        gamma.incr_gamma_sampled();
        gamma.incr_gamma_sampled();
        gamma.incr_pair_sampled();

        assert_eq!(gamma.gamma_sampled(), 2);
        assert_eq!(gamma.conversion_sampled(), 0);
        assert_eq!(gamma.pair_sampled(), 1);
    }

    #[test]
    fn probabilities_are_clamped() {
        let mut gamma = nickel_gamma();
        gamma.set_multi_transition_prob(1.2);
        assert_eq!(gamma.multi_transition_prob, 1.0);

        gamma.set_gamma_intensity(-0.5);
        assert_eq!(gamma.gamma_intensity, 0.0);
    }
}
