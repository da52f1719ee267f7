// standard library
use std::sync::Arc;

// ensdf modules
use ensdf_relax::{AtomicContext, AtomicRelaxation, Cutoffs, Relax, RelaxationParticle, Shell};
use ensdf_utils::f;

// internal modules
use crate::error::Result;
use crate::records::Record;

// external crates
use rand::RngCore;
use serde::Serialize;

/// Multipliers converting relative intensities to absolute ones
///
/// | Field | Columns | Converts                                 |
/// | ----- | ------- | ---------------------------------------- |
/// | NR    | 10-19   | relative gamma intensities               |
/// | NT    | 22-29   | relative transition intensities          |
/// | BR    | 32-39   | branching ratio of this decay mode       |
/// | NB    | 42-49   | relative beta and alpha intensities      |
///
/// Blank multipliers are treated as 1 wherever they are applied.
///
/// The normalisation also describes the daughter atom, so it carries the
/// relaxation data for vacancies created in it.
#[derive(Debug, Serialize)]
pub struct Normalisation {
    /// Raw line block
    #[serde(skip)]
    pub record: Record,
    /// Atomic number of the daughter
    pub z: u8,
    /// Relative gamma multiplier (NR)
    pub relative: f64,
    /// Uncertainty on NR
    pub relative_uncertainty: f64,
    /// Transition intensity multiplier (NT)
    pub transition: f64,
    /// Uncertainty on NT
    pub transition_uncertainty: f64,
    /// Branching ratio (BR)
    pub branch: f64,
    /// Uncertainty on BR
    pub branch_uncertainty: f64,
    /// Beta and alpha multiplier (NB)
    pub beta: f64,
    /// Uncertainty on NB
    pub beta_uncertainty: f64,
    /// Binding energy (keV) of every tabulated shell, in shell order
    pub binding_energies: Vec<f64>,
    #[serde(skip)]
    atomic: AtomicContext,
}

impl Normalisation {
    /// Build from a normalisation line block
    pub fn new(record: Record, generator: Option<Arc<dyn AtomicRelaxation>>) -> Self {
        let fields = record.fields();
        let atomic = AtomicContext::new(record.z(), generator);

        let binding_energies = Shell::ALL
            .iter()
            .take(atomic.shell_count())
            .map(|shell| atomic.binding_energy(*shell))
            .collect();

        Self {
            z: atomic.z,
            relative: fields.number(10, 19),
            relative_uncertainty: fields.uncertainty((10, 19), (20, 21)),
            transition: fields.number(22, 29),
            transition_uncertainty: fields.uncertainty((22, 29), (30, 31)),
            branch: fields.number(32, 39),
            branch_uncertainty: fields.uncertainty((32, 39), (40, 41)),
            beta: fields.number(42, 49),
            beta_uncertainty: fields.uncertainty((42, 49), (50, 55)),
            binding_energies,
            atomic,
            record,
        }
    }

    /// NR, or 1 if blank
    pub fn relative_multiplier(&self) -> f64 {
        or_unity(self.relative)
    }

    /// NT, or 1 if blank
    pub fn transition_multiplier(&self) -> f64 {
        or_unity(self.transition)
    }

    /// BR, or 1 if blank
    pub fn branch_multiplier(&self) -> f64 {
        or_unity(self.branch)
    }

    /// NB, or 1 if blank
    pub fn beta_multiplier(&self) -> f64 {
        or_unity(self.beta)
    }

    /// Number of shells with relaxation data for the daughter
    pub fn shell_count(&self) -> usize {
        self.binding_energies.len()
    }

    /// Binding energy (keV) of a shell, zero if not tabulated
    pub fn binding_energy(&self, shell: Shell) -> f64 {
        self.binding_energies
            .get(shell.index())
            .copied()
            .unwrap_or(0.0)
    }

    /// Serialise to a JSON format string
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl Relax for Normalisation {
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

impl std::fmt::Display for Normalisation {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let mut s = "Normalisation\n".to_string();
        s += &f!("  Nuclide          {}\n", self.record.nucid.trim());
        s += &f!("  NR               {}\n", self.relative_multiplier());
        s += &f!("  NT               {}\n", self.transition_multiplier());
        s += &f!("  BR               {}\n", self.branch_multiplier());
        s += &f!("  NB               {}\n", self.beta_multiplier());
        s += &f!("  Shells           {}", self.shell_count());
        write!(f, "{s}")
    }
}

fn or_unity(value: f64) -> f64 {
    if value == 0.0 {
        1.0
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::tests::{card, record};
    use crate::records::RecordType;

    #[test]
    fn multipliers() {
        let lines = vec![card(&[
            (1, " 60NI"),
            (8, "N"),
            (10, "1.0"),
            (32, "1.0"),
            (42, "1.0"),
        ])];
        let normalisation = Normalisation::new(record(RecordType::Normalisation, &lines), None);

        assert_eq!(normalisation.z, 28);
        assert_eq!(normalisation.relative, 1.0);
        assert_eq!(normalisation.transition, 0.0);
        assert_eq!(normalisation.transition_multiplier(), 1.0);
        assert_eq!(normalisation.branch_multiplier(), 1.0);
        assert_eq!(normalisation.shell_count(), 0);
        assert_eq!(normalisation.binding_energy(Shell::K), 0.0);
    }

    #[test]
    fn partial_branch() {
        let lines = vec![card(&[
            (1, "221FR"),
            (8, "N"),
            (10, "0.114"),
            (20, "3"),
            (32, "0.99"),
            (42, "0.5"),
        ])];
        let normalisation = Normalisation::new(record(RecordType::Normalisation, &lines), None);

        assert_eq!(normalisation.relative_multiplier(), 0.114);
        assert!((normalisation.relative_uncertainty - 0.003).abs() < 1e-12);
        assert_eq!(normalisation.branch_multiplier(), 0.99);
        assert_eq!(normalisation.beta_multiplier(), 0.5);
    }
}
