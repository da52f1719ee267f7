// standard library
use std::sync::atomic::{AtomicU64, Ordering};

// ensdf modules
use ensdf_utils::{f, ValueExt};

// internal modules
use crate::error::Result;
use crate::records::Record;

// external crates
use serde::Serialize;

/// Alpha emission
///
/// | Field | Columns |
/// | ----- | ------- |
/// | E     | 10-19   |
/// | DE    | 20-21   |
/// | IA    | 22-29   |
/// | DIA   | 30-31   |
/// | HF    | 32-39   |
#[derive(Debug, Serialize)]
pub struct Alpha {
    /// Raw line block
    #[serde(skip)]
    pub record: Record,
    /// Alpha energy (keV)
    pub energy: f64,
    /// Uncertainty on the energy (keV)
    pub energy_uncertainty: f64,
    /// Emission intensity
    pub intensity: f64,
    /// Uncertainty on the intensity
    pub intensity_uncertainty: f64,
    /// Hindrance factor
    pub hindrance: f64,
    /// Charge of the alpha particle
    pub charge: i8,
    #[serde(skip)]
    sampled: AtomicU64,
}

impl Alpha {
    /// Build from an alpha line block
    pub fn new(record: Record) -> Self {
        let fields = record.fields();
        Self {
            energy: fields.number(10, 19),
            energy_uncertainty: fields.uncertainty((10, 19), (20, 21)),
            intensity: fields.number(22, 29),
            intensity_uncertainty: fields.uncertainty((22, 29), (30, 31)),
            hindrance: fields.number(32, 39),
            charge: 2,
            sampled: AtomicU64::new(0),
            record,
        }
    }

    /// Set the normalised emission intensity
    pub fn set_intensity(&mut self, intensity: f64) {
        self.intensity = intensity.max(0.0);
    }

    /// Count one sampled emission
    pub fn incr_sampled(&self) {
        self.sampled.fetch_add(1, Ordering::Relaxed);
    }

    /// Number of sampled emissions so far
    pub fn sampled(&self) -> u64 {
        self.sampled.load(Ordering::Relaxed)
    }

    /// Serialise to a JSON format string
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl std::fmt::Display for Alpha {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let mut s = "Alpha\n".to_string();
        s += &f!(
            "  Energy           {} +/- {} keV\n",
            self.energy,
            self.energy_uncertainty
        );
        s += &f!("  Intensity        {}\n", self.intensity.sci(5, 2));
        s += &f!("  Hindrance        {}", self.hindrance);
        write!(f, "{s}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::tests::{card, record};
    use crate::records::RecordType;

    #[test]
    fn alpha_fields() {
        let lines = vec![card(&[
            (1, "217AT"),
            (8, "A"),
            (10, "6341"),
            (20, "2"),
            (22, "83.4"),
            (30, "8"),
            (32, "1.0"),
        ])];
        let alpha = Alpha::new(record(RecordType::Alpha, &lines));

        assert_eq!(alpha.energy, 6341.0);
        assert!((alpha.energy_uncertainty - 2.0).abs() < 1e-12);
        assert_eq!(alpha.intensity, 83.4);
        assert!((alpha.intensity_uncertainty - 0.8).abs() < 1e-12);
        assert_eq!(alpha.hindrance, 1.0);
        assert_eq!(alpha.charge, 2);

        alpha.incr_sampled();
        assert_eq!(alpha.sampled(), 1);
    }
}
