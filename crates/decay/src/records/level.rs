// ensdf modules
use ensdf_utils::{f, ValueExt};

// internal modules
use crate::error::Result;
use crate::records::{Record, SIGNIFICANCE_THRESHOLD};

// external crates
use serde::Serialize;

/// Levels with a half-life longer than this (s) are treated as metastable
pub const METASTABLE_HALF_LIFE: f64 = 1e-6;

/// Energy level of the daughter nuclide
///
/// | Field | Columns |
/// | ----- | ------- |
/// | E     | 10-19   |
/// | J     | 22-39   |
/// | T     | 40-49   |
/// | MS    | 78-79   |
///
/// Owns the gamma transitions out of it, and is also the sink of any gamma
/// transitions that end on it.
#[derive(Debug, Clone, Serialize)]
pub struct Level {
    /// Raw line block
    #[serde(skip)]
    pub record: Record,
    /// Excitation energy (keV)
    pub energy: f64,
    /// Uncertainty on the energy (keV)
    pub energy_uncertainty: f64,
    /// Spin and parity
    pub spin_parity: String,
    /// Half-life (s)
    pub half_life: f64,
    /// Explicitly flagged as metastable in the MS field
    pub metastable_flag: bool,
    /// Probability per parent disintegration that this level is populated
    pub disintegration_intensity: f64,
    /// Whether the level is populated often enough to decay further
    pub can_decay: bool,
}

impl Level {
    /// Build from a level line block
    pub fn new(record: Record) -> Self {
        let fields = record.fields();
        let metastable_flag = fields.text(78, 79).to_uppercase().starts_with('M');

        Self {
            energy: fields.number(10, 19),
            energy_uncertainty: fields.uncertainty((10, 19), (20, 21)),
            spin_parity: fields.text(22, 39),
            half_life: fields.half_life(40, 49),
            metastable_flag,
            disintegration_intensity: 0.0,
            can_decay: false,
            record,
        }
    }

    /// Flagged as metastable, or long-lived enough to be treated as one
    pub fn is_metastable(&self) -> bool {
        self.metastable_flag
            || (self.half_life.is_finite() && self.half_life > METASTABLE_HALF_LIFE)
    }

    /// Accumulate intensity from a branch feeding this level
    ///
    /// Feeding is cumulative, every incoming branch adds to the total.
    pub fn add_disintegration_intensity(&mut self, intensity: f64) {
        self.disintegration_intensity += intensity.max(0.0);
        self.can_decay = self.disintegration_intensity > SIGNIFICANCE_THRESHOLD;
    }

    /// Serialise to a JSON format string
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let mut s = "Level\n".to_string();
        s += &f!(
            "  Energy           {} +/- {} keV\n",
            self.energy,
            self.energy_uncertainty
        );
        s += &f!("  Spin parity      {}\n", self.spin_parity);
        s += &f!("  Half life        {} s\n", self.half_life.sci(5, 2));
        s += &f!("  Metastable       {}\n", self.is_metastable());
        s += &f!(
            "  Disintegrations  {}\n",
            self.disintegration_intensity.sci(5, 2)
        );
        s += &f!("  Can decay        {}", self.can_decay);
        write!(f, "{s}")
    }
}
